//! Caller identity as forwarded by the identity provider in front of the
//! service.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};

use crate::DEFAULT_STORE_ID;
use crate::domain::context::AdminContext;
use crate::domain::permission::PermissionTable;
use crate::domain::role::Role;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const USER_EMAIL_HEADER: &str = "X-User-Email";
pub const USER_ROLE_HEADER: &str = "X-User-Role";
pub const STORE_ID_HEADER: &str = "X-Store-Id";

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Build the caller's context. Fails only when no user id was forwarded;
/// a missing or unknown role yields a context that is denied everything.
pub fn context_from_request(req: &HttpRequest) -> Result<AdminContext, actix_web::Error> {
    let Some(user_id) = header(req, USER_ID_HEADER) else {
        return Err(actix_web::error::ErrorUnauthorized("missing user identity"));
    };

    let raw_role = header(req, USER_ROLE_HEADER);
    let role = Role::resolve(raw_role);
    if let (None, Some(raw_role)) = (role, raw_role) {
        log::warn!("User {user_id} has unrecognised role `{raw_role}`");
    }

    let store_id = header(req, STORE_ID_HEADER).unwrap_or(DEFAULT_STORE_ID);
    let mut ctx = AdminContext::new(user_id, store_id, role);
    if let Some(email) = header(req, USER_EMAIL_HEADER) {
        ctx = ctx.with_email(email);
    }
    if let Some(table) = req.app_data::<web::Data<PermissionTable>>() {
        ctx = ctx.with_permissions(table.clone().into_inner());
    }
    Ok(ctx)
}

impl FromRequest for AdminContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(context_from_request(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::permission::Permission;
    use actix_web::test::TestRequest;

    #[test]
    fn headers_build_context() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "u-1"))
            .insert_header((USER_EMAIL_HEADER, "sara@example.com"))
            .insert_header((USER_ROLE_HEADER, "manager"))
            .insert_header((STORE_ID_HEADER, "fager"))
            .to_http_request();

        let ctx = context_from_request(&req).expect("context should build");

        assert_eq!(ctx.user_id, "u-1");
        assert_eq!(ctx.store_id, "fager");
        assert_eq!(ctx.role, Some(Role::Manager));
        assert_eq!(ctx.display_name(), "sara");
    }

    #[test]
    fn missing_user_is_rejected() {
        let req = TestRequest::default()
            .insert_header((USER_ROLE_HEADER, "admin"))
            .to_http_request();
        assert!(context_from_request(&req).is_err());
    }

    #[test]
    fn unknown_role_is_denied_everything() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "u-1"))
            .insert_header((USER_ROLE_HEADER, "Admin"))
            .to_http_request();

        let ctx = context_from_request(&req).expect("context should build");

        assert_eq!(ctx.role, None);
        assert_eq!(ctx.store_id, DEFAULT_STORE_ID);
        assert!(!ctx.can(Permission::ViewProducts));
    }

    #[test]
    fn app_permission_table_is_used() {
        let table = PermissionTable::empty().allow(Permission::DeleteOrder, &[Role::Staff]);
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "u-1"))
            .insert_header((USER_ROLE_HEADER, "staff"))
            .app_data(web::Data::new(table))
            .to_http_request();

        let ctx = context_from_request(&req).expect("context should build");

        assert!(ctx.can(Permission::DeleteOrder));
        assert!(!ctx.can(Permission::ViewProducts));
    }
}
