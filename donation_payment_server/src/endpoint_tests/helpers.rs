use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use log::debug;

use crate::auth::{ROLES_HEADER, USER_ID_HEADER};

/// Identity headers for a test request: `(user id, comma-separated roles)`. Pass `None` to simulate a request that
/// slipped past the upstream proxy without being authenticated.
pub type Identity<'a> = Option<(&'a str, &'a str)>;

pub async fn get_request(
    identity: Identity<'_>,
    path: &str,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let mut req = TestRequest::get().uri(path);
    if let Some((user_id, roles)) = identity {
        req = req.insert_header((USER_ID_HEADER, user_id));
        if !roles.is_empty() {
            req = req.insert_header((ROLES_HEADER, roles));
        }
    }
    let req = req.to_request();
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}
