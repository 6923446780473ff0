use serde::Serialize;
use serde_json::json;

use crate::domain::category::Category;
use crate::domain::context::AdminContext;
use crate::domain::permission::{Capabilities, Permission};
use crate::forms::categories::CategoryForm;
use crate::repository::{ActivityWriter, CategoryReader, CategoryWriter};
use crate::services::{ServiceError, ServiceResult, ensure, record_activity};
use crate::view::{has_dangling_parent, parent_options, resolve_display_name, sort_by_display_order};

pub const CATEGORY_PAGE_PERMISSIONS: [Permission; 1] = [Permission::ManageCategories];

const ACTION_CREATE: &str = "إضافة قسم";
const ACTION_UPDATE: &str = "تعديل قسم";
const ACTION_DELETE: &str = "حذف قسم";

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CategoryView {
    pub id: String,
    pub name: String,
    /// `"Parent > Child"` for sub-categories whose parent resolves.
    pub display_name: String,
    pub parent_id: Option<String>,
    pub icon: Option<String>,
    pub display_order: i64,
    pub is_active: bool,
    pub products_count: i64,
}

/// Entry of the parent selector.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ParentOption {
    pub id: String,
    pub name: String,
}

/// Data required to render the categories page.
#[derive(Debug, Serialize)]
pub struct CategoriesPageData {
    pub categories: Vec<CategoryView>,
    pub parent_options: Vec<ParentOption>,
    pub capabilities: Capabilities,
}

/// Loads the categories page in display order.
pub fn load_categories_page<R>(repo: &R, ctx: &AdminContext) -> ServiceResult<CategoriesPageData>
where
    R: CategoryReader + ?Sized,
{
    ensure(ctx, Permission::ViewProducts)?;

    let mut categories = repo
        .list_categories(&ctx.store_id)
        .map_err(ServiceError::from)?;
    sort_by_display_order(&mut categories);

    let views = categories
        .iter()
        .map(|category| {
            if has_dangling_parent(category, &categories) {
                log::warn!(
                    "Category {} in store {} points at missing parent {:?}",
                    category.id,
                    ctx.store_id,
                    category.parent_id
                );
            }
            CategoryView {
                id: category.id.clone(),
                name: category.name.clone(),
                display_name: resolve_display_name(category, &categories),
                parent_id: category.parent_id().map(str::to_string),
                icon: category.icon.clone(),
                display_order: category.display_order,
                is_active: category.is_active(),
                products_count: category.products_count(),
            }
        })
        .collect();

    let parent_options = parent_options(&categories)
        .into_iter()
        .map(|category| ParentOption {
            id: category.id,
            name: category.name,
        })
        .collect();

    Ok(CategoriesPageData {
        categories: views,
        parent_options,
        capabilities: ctx.capabilities(&CATEGORY_PAGE_PERMISSIONS),
    })
}

/// A parent must be another category of the same store.
fn check_parent<R>(
    repo: &R,
    ctx: &AdminContext,
    category_id: Option<&str>,
    parent_id: Option<&str>,
) -> ServiceResult<()>
where
    R: CategoryReader + ?Sized,
{
    let Some(parent_id) = parent_id else {
        return Ok(());
    };
    if Some(parent_id) == category_id {
        return Err(ServiceError::Form(
            "a category cannot be its own parent".to_string(),
        ));
    }
    match repo
        .get_category_by_id(&ctx.store_id, parent_id)
        .map_err(ServiceError::from)?
    {
        Some(_) => Ok(()),
        None => Err(ServiceError::Form(format!(
            "parent category `{parent_id}` does not exist"
        ))),
    }
}

pub fn create_category<R>(
    repo: &R,
    ctx: &AdminContext,
    form: CategoryForm,
) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter + ActivityWriter + ?Sized,
{
    ensure(ctx, Permission::ManageCategories)?;

    let draft = form
        .into_draft()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    check_parent(repo, ctx, None, draft.parent_id.as_deref())?;

    let category = repo
        .create_category(&ctx.store_id, &draft)
        .map_err(ServiceError::from)?;

    record_activity(
        repo,
        ctx,
        ACTION_CREATE,
        json!({ "id": category.id, "name": category.name }),
    );
    Ok(category)
}

pub fn update_category<R>(
    repo: &R,
    ctx: &AdminContext,
    category_id: &str,
    form: CategoryForm,
) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter + ActivityWriter + ?Sized,
{
    ensure(ctx, Permission::ManageCategories)?;

    let draft = form
        .into_draft()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    check_parent(repo, ctx, Some(category_id), draft.parent_id.as_deref())?;

    let category = repo
        .update_category(&ctx.store_id, category_id, &draft)
        .map_err(ServiceError::from)?;

    record_activity(
        repo,
        ctx,
        ACTION_UPDATE,
        json!({ "id": category.id, "name": category.name }),
    );
    Ok(category)
}

pub fn delete_category<R>(repo: &R, ctx: &AdminContext, category_id: &str) -> ServiceResult<()>
where
    R: CategoryWriter + ActivityWriter + ?Sized,
{
    ensure(ctx, Permission::ManageCategories)?;

    repo.delete_category(&ctx.store_id, category_id)
        .map_err(ServiceError::from)?;

    record_activity(repo, ctx, ACTION_DELETE, json!({ "id": category_id }));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::activity::NewActivity;
    use crate::domain::category::CategoryDraft;
    use crate::domain::role::Role;
    use crate::repository::mock::{MockActivityWriter, MockCategoryReader, MockCategoryWriter};
    use crate::repository::{RepositoryError, RepositoryResult};
    use crate::services::test_support::{STORE, ctx};

    struct FakeRepo {
        category_reader: MockCategoryReader,
        category_writer: MockCategoryWriter,
        activity_writer: MockActivityWriter,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                category_reader: MockCategoryReader::new(),
                category_writer: MockCategoryWriter::new(),
                activity_writer: MockActivityWriter::new(),
            }
        }
    }

    impl CategoryReader for FakeRepo {
        fn list_categories(&self, store_id: &str) -> RepositoryResult<Vec<Category>> {
            self.category_reader.list_categories(store_id)
        }

        fn get_category_by_id(
            &self,
            store_id: &str,
            category_id: &str,
        ) -> RepositoryResult<Option<Category>> {
            self.category_reader
                .get_category_by_id(store_id, category_id)
        }
    }

    impl CategoryWriter for FakeRepo {
        fn create_category(
            &self,
            store_id: &str,
            draft: &CategoryDraft,
        ) -> RepositoryResult<Category> {
            self.category_writer.create_category(store_id, draft)
        }

        fn update_category(
            &self,
            store_id: &str,
            category_id: &str,
            draft: &CategoryDraft,
        ) -> RepositoryResult<Category> {
            self.category_writer
                .update_category(store_id, category_id, draft)
        }

        fn delete_category(&self, store_id: &str, category_id: &str) -> RepositoryResult<()> {
            self.category_writer.delete_category(store_id, category_id)
        }
    }

    impl ActivityWriter for FakeRepo {
        fn record_activity(&self, store_id: &str, activity: &NewActivity) -> RepositoryResult<()> {
            self.activity_writer.record_activity(store_id, activity)
        }
    }

    fn category(id: &str, name: &str, parent_id: Option<&str>, display_order: i64) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            parent_id: parent_id.map(str::to_string),
            display_order,
            ..Category::default()
        }
    }

    fn form(name: &str, parent_id: Option<&str>) -> CategoryForm {
        CategoryForm {
            name: name.to_string(),
            parent_id: parent_id.map(str::to_string),
            icon: None,
            display_order: None,
            is_active: true,
        }
    }

    #[test]
    fn page_resolves_names_and_parent_options() {
        let mut repo = FakeRepo::new();
        repo.category_reader
            .expect_list_categories()
            .times(1)
            .withf(|store_id| store_id == STORE)
            .returning(|_| {
                Ok(vec![
                    category("c3", "Candy", Some("nonexistent-id"), 3),
                    category("c2", "Snacks", Some("c1"), 2),
                    category("c1", "Food", None, 1),
                ])
            });

        let page = load_categories_page(&repo, &ctx(Some(Role::Staff))).expect("page should load");

        let names: Vec<&str> = page
            .categories
            .iter()
            .map(|view| view.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["Food", "Food > Snacks", "Candy"]);
        assert_eq!(page.parent_options.len(), 1);
        assert_eq!(page.parent_options[0].id, "c1");
        assert_eq!(page.capabilities.get("manage_categories"), Some(&false));
    }

    #[test]
    fn create_requires_manage_categories() {
        let mut repo = FakeRepo::new();
        repo.category_writer.expect_create_category().times(0);

        let result = create_category(&repo, &ctx(Some(Role::Staff)), form("Drinks", None));

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn create_rejects_unknown_parent() {
        let mut repo = FakeRepo::new();
        repo.category_reader
            .expect_get_category_by_id()
            .times(1)
            .returning(|_, _| Ok(None));
        repo.category_writer.expect_create_category().times(0);

        let result = create_category(&repo, &ctx(Some(Role::Manager)), form("Juice", Some("c9")));

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn create_records_activity_even_if_logging_fails() {
        let mut repo = FakeRepo::new();
        repo.category_reader
            .expect_get_category_by_id()
            .returning(|_, id| Ok(Some(category(id, "Drinks", None, 1))));
        repo.category_writer
            .expect_create_category()
            .times(1)
            .withf(|_, draft| draft.name == "Juice" && draft.parent_id.as_deref() == Some("c2"))
            .returning(|_, draft| Ok(draft.clone().into_category("cat-7", Some(0))));
        repo.activity_writer
            .expect_record_activity()
            .times(1)
            .withf(|_, activity| activity.action == ACTION_CREATE)
            .returning(|_, _| Err(RepositoryError::Unexpected("offline".into())));

        let created = create_category(&repo, &ctx(Some(Role::Manager)), form("Juice", Some("c2")))
            .expect("create should succeed");

        assert_eq!(created.id, "cat-7");
    }

    #[test]
    fn update_rejects_self_parent() {
        let mut repo = FakeRepo::new();
        repo.category_writer.expect_update_category().times(0);

        let result = update_category(&repo, &ctx(Some(Role::Admin)), "c1", form("Food", Some("c1")));

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn delete_logs_activity() {
        let mut repo = FakeRepo::new();
        repo.category_writer
            .expect_delete_category()
            .times(1)
            .withf(|store_id, id| store_id == STORE && id == "c1")
            .returning(|_, _| Ok(()));
        repo.activity_writer
            .expect_record_activity()
            .times(1)
            .withf(|_, activity| activity.action == ACTION_DELETE && activity.details["id"] == "c1")
            .returning(|_, _| Ok(()));

        assert!(delete_category(&repo, &ctx(Some(Role::Manager)), "c1").is_ok());
    }

    #[test]
    fn delete_missing_category_is_not_found() {
        let mut repo = FakeRepo::new();
        repo.category_writer
            .expect_delete_category()
            .returning(|_, _| Err(RepositoryError::NotFound));
        repo.activity_writer.expect_record_activity().times(0);

        assert!(matches!(
            delete_category(&repo, &ctx(Some(Role::Admin)), "c1"),
            Err(ServiceError::NotFound)
        ));
    }
}
