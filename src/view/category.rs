use crate::domain::category::Category;

/// Separator between parent and child names in qualified labels.
pub const HIERARCHY_SEPARATOR: &str = " > ";

/// Order categories by `display_order`, keeping the input order for ties.
pub fn sort_by_display_order(categories: &mut [Category]) {
    // `sort_by_key` is stable, which is what keeps ties in input order.
    categories.sort_by_key(|category| category.display_order);
}

/// Locate the parent of `category` among `all`.
///
/// A self-reference is not a parent.
pub fn find_parent<'a>(category: &Category, all: &'a [Category]) -> Option<&'a Category> {
    let parent_id = category.parent_id()?;
    all.iter()
        .find(|candidate| candidate.id == parent_id && candidate.id != category.id)
}

/// Whether `category` names a parent that cannot be found.
pub fn has_dangling_parent(category: &Category, all: &[Category]) -> bool {
    category.parent_id().is_some() && find_parent(category, all).is_none()
}

/// Label shown for a category: `"Parent > Child"` when the parent resolves,
/// otherwise the category's own name.
///
/// Only one level is resolved; grandparents are not prefixed.
pub fn resolve_display_name(category: &Category, all: &[Category]) -> String {
    match find_parent(category, all) {
        Some(parent) => format!("{}{HIERARCHY_SEPARATOR}{}", parent.name, category.name),
        None => category.name.clone(),
    }
}

/// Categories that may be chosen as a parent: top-level ones, in display order.
pub fn parent_options(all: &[Category]) -> Vec<Category> {
    let mut options: Vec<Category> = all
        .iter()
        .filter(|category| category.parent_id().is_none())
        .cloned()
        .collect();
    sort_by_display_order(&mut options);
    options
}
