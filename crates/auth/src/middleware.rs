use super::*;
use actix_web::FromRequest;
use actix_web::HttpRequest;
use actix_web::dev::Payload;
use actix_web::web;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio_postgres::Client;

/// Extractor resolving a request to its [`Actor`].
///
/// Never fails: a missing, malformed, expired, or orphaned bearer token
/// resolves to [`Actor::Anon`]. Whether anonymity is acceptable is decided
/// by the visibility policy per operation, so every handler answers with
/// the same response envelope instead of a framework 401.
///
/// The account row is re-read per request so the verified flag is current.
impl FromRequest for Actor {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let crypto = req.app_data::<web::Data<Crypto>>().cloned();
        let db = req.app_data::<web::Data<Arc<Client>>>().cloned();
        let header = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_owned());
        Box::pin(async move {
            let token = match header.as_deref().and_then(|h| h.strip_prefix("Bearer ")) {
                Some(token) => token,
                None => return Ok(Actor::Anon),
            };
            let crypto = match crypto {
                Some(crypto) => crypto,
                None => return Ok(Actor::Anon),
            };
            let claims = match crypto.decode(token) {
                Ok(claims) if !claims.expired() => claims,
                _ => return Ok(Actor::Anon),
            };
            let db = match db {
                Some(db) => db,
                None => return Ok(Actor::Anon),
            };
            match db.account(claims.account()).await {
                Ok(account) => Ok(Actor::from(account)),
                Err(e) => {
                    log::error!("account load failed: {}", e);
                    Ok(Actor::Anon)
                }
            }
        })
    }
}
