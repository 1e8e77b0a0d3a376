//! Access control middleware for the donation server.
//! This middleware can be placed on any route or service.
//!
//! It reads the trusted identity headers the upstream proxy attaches to every request, checks the caller's roles
//! against the required roles for the route, and stores the parsed [`AuthClaims`] in the request extensions for
//! the handler to use. Requests without an identity are rejected with a 401, and requests whose roles do not cover
//! the route's requirements get a 403 Forbidden response.

use std::pin::Pin;
use std::rc::Rc;
use actix_web::dev::{forward_ready, Service, Transform};
use actix_web::{dev::ServiceRequest, dev::ServiceResponse, Error, HttpMessage};
use actix_web::error::{ErrorBadRequest, ErrorForbidden, ErrorUnauthorized};
use futures::future::{ok, Ready};
use futures::Future;
use donation_payment_engine::db_types::Role;
use crate::auth::AuthClaims;
use crate::errors::AuthError;

pub struct AclMiddlewareFactory {
    required_roles: Vec<Role>,
}

impl AclMiddlewareFactory {
    pub fn new(required_roles: &[Role]) -> Self {
        AclMiddlewareFactory { required_roles: required_roles.to_vec() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
    where
        S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
        S::Future: 'static,
        B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AclMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AclMiddlewareService {
            required_roles: self.required_roles.clone(),
            service: Rc::new(service),
        })
    }
}

pub struct AclMiddlewareService<S> {
    required_roles: Vec<Role>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
    where
        S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
        S::Future: 'static,
        B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let required_roles = self.required_roles.clone();
        Box::pin(async move {
            let claims = match AuthClaims::from_request_headers(req.headers()) {
                Ok(claims) => claims,
                Err(e @ AuthError::MissingIdentity) => {
                    log::debug!("🔑️ Rejecting request to {}: {e}", req.path());
                    return Err(ErrorUnauthorized(e.to_string()));
                },
                Err(e) => {
                    log::debug!("🔑️ Rejecting request to {}: {e}", req.path());
                    return Err(ErrorBadRequest(e.to_string()));
                },
            };
            if required_roles.iter().all(|role| claims.roles.contains(role)) {
                req.extensions_mut().insert(claims);
                service.call(req).await
            } else {
                Err(ErrorForbidden("Insufficient permissions"))
            }
        })
    }
}
