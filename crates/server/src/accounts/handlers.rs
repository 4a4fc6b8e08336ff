use crate::dto::*;
use crate::envelope::Code;
use crate::envelope::oops;
use actix_web::HttpResponse;
use actix_web::web;
use cardbox_auth::*;
use cardbox_core::ID;
use cardbox_core::Unique;
use std::sync::Arc;
use tokio_postgres::Client;

/// POST /signup
///
/// Creates a pending account and hands the verification code to the outbox.
/// The insert itself enforces the pending-verification queue cap, and the
/// unique constraints catch the races the pre-insert existence checks miss.
pub async fn signup(
    db: web::Data<Arc<Client>>,
    outbox: web::Data<Outbox>,
    body: web::Json<SignupRequest>,
) -> HttpResponse {
    if let Err(code) = body.validate() {
        return code.reply();
    }
    let db = db.get_ref();
    match db.email_taken(&body.email).await {
        Ok(true) => return Code::EmailConflict.reply(),
        Ok(false) => {}
        Err(e) => return oops(e),
    }
    match db.username_taken(&body.username).await {
        Ok(true) => return Code::UnameConflict.reply(),
        Ok(false) => {}
        Err(e) => return oops(e),
    }
    let hashword = match password::hash(&body.password) {
        Ok(hashword) => hashword,
        Err(e) => return oops(e),
    };
    let code = code::generate();
    let account = Account::new(
        ID::default(),
        body.username.clone(),
        body.email.clone(),
        false,
    );
    match db.signup(&account, &hashword, &code).await {
        Ok(Signup::QueueFull) => Code::Queue.reply(),
        Ok(Signup::Created) => match outbox.deliver(account.email(), &code) {
            Ok(()) => Code::Okay.with(serde_json::json!({
                "user": UserDto::from(&account),
            })),
            Err(e) => {
                log::error!("verification mail failed for {}: {}", account.email(), e);
                Code::MailNotSent.reply()
            }
        },
        Err(e) if collided(&e) => match e.as_db_error().and_then(|d| d.constraint()) {
            Some(constraint) if constraint.contains("email") => Code::EmailConflict.reply(),
            _ => Code::UnameConflict.reply(),
        },
        Err(e) => oops(e),
    }
}

/// GET /signup-verify?code=...
pub async fn signup_verify(
    db: web::Data<Arc<Client>>,
    query: web::Query<VerifyQuery>,
) -> HttpResponse {
    if !code::wellformed(&query.code) {
        return Code::Validation.reply();
    }
    match db.verify(&query.code).await {
        Ok(Verification::Unknown) => Code::AvCodeNotValid.reply(),
        Ok(Verification::Verified) => Code::Verified.reply(),
        Ok(Verification::Already) => Code::VerifiedAlready.reply(),
        Err(e) => oops(e),
    }
}

/// POST /signin
///
/// Wrong username and wrong password answer identically, so the endpoint
/// confirms no account's existence.
pub async fn signin(
    db: web::Data<Arc<Client>>,
    crypto: web::Data<Crypto>,
    body: web::Json<SigninRequest>,
) -> HttpResponse {
    let (account, hashword) = match db.lookup(&body.username).await {
        Ok(Some(found)) => found,
        Ok(None) => return Code::AccessDenied.reply(),
        Err(e) => return oops(e),
    };
    if !password::verify(&body.password, &hashword) {
        return Code::AccessDenied.reply();
    }
    let claims = Claims::new(account.id(), account.username().to_string());
    match crypto.encode(&claims) {
        Ok(token) => Code::Okay.with(serde_json::json!({
            "token": token,
            "user": UserDto::from(&account),
        })),
        Err(e) => oops(e),
    }
}

/// GET /get-me
pub async fn me(actor: Actor) -> HttpResponse {
    match actor {
        Actor::Auth(account) => Code::SignedIn.with(serde_json::json!({
            "user": UserDto::from(&account),
        })),
        Actor::Anon => Code::NotSignedIn.reply(),
    }
}
