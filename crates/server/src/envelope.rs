//! Response envelope shared by every endpoint.
//!
//! Every reply is `{code, message, ...payload}` with `code` drawn from a
//! fixed enumeration the clients switch on. The spelling of each code is
//! wire format — do not rename variants without a client migration.
use actix_web::HttpResponse;
use actix_web::http::StatusCode;

/// Symbolic response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Code {
    Okay,
    Validation,
    AuthRequired,
    VerificationRequired,
    AccessDenied,
    UserNotFound,
    DeckNotFound,
    CardNotFound,
    Queue,
    EmailConflict,
    UnameConflict,
    MailNotSent,
    Verified,
    VerifiedAlready,
    AvCodeNotValid,
    NotSignedIn,
    SignedIn,
    TooMuchData,
    NoCardsInDeck,
    DevMessedUp,
}

impl Code {
    /// Human-readable companion to the symbolic code.
    pub fn message(self) -> &'static str {
        match self {
            Self::Okay => "All good.",
            Self::AuthRequired => "You should be signed in to access resource.",
            Self::VerificationRequired => {
                "You should be a verified user to access resource."
            }
            Self::AccessDenied => "You do not have access to resource.",
            Self::Validation => {
                "Validation error. The request data does not follow the schema \
                 shared between client and server. Error reported."
            }
            Self::UserNotFound => "User with such username is not found.",
            Self::DeckNotFound => "Deck with such name is not found.",
            Self::CardNotFound => "Card with such id is not found.",
            Self::Queue => {
                "Cannot create account. The queue of accounts pending verification \
                 is full. Try again later."
            }
            Self::EmailConflict => {
                "Cannot create account. An account with such email already exists."
            }
            Self::UnameConflict => {
                "Cannot create account. An account with such username already exists."
            }
            Self::MailNotSent => {
                "Account created, but failed to send verification email. \
                 Try requesting to re-send."
            }
            Self::Verified => "Account verified successfully.",
            Self::VerifiedAlready => "Account is already verified.",
            Self::AvCodeNotValid => "Account verification code is not valid for any account.",
            Self::NotSignedIn => "You are not signed in.",
            Self::SignedIn => "You are signed in.",
            Self::TooMuchData => {
                "Cannot create new data in the database. \
                 Too many instances of a model exist already."
            }
            Self::NoCardsInDeck => "There are no cards in deck.",
            Self::DevMessedUp => {
                "Somewhat unexpected behavior occurred, big time. Error reported."
            }
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            Self::Okay
            | Self::Verified
            | Self::VerifiedAlready
            | Self::SignedIn
            | Self::NotSignedIn
            | Self::NoCardsInDeck => StatusCode::OK,
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::AuthRequired | Self::VerificationRequired | Self::AccessDenied => {
                StatusCode::UNAUTHORIZED
            }
            Self::UserNotFound
            | Self::DeckNotFound
            | Self::CardNotFound
            | Self::AvCodeNotValid => StatusCode::NOT_FOUND,
            Self::Queue | Self::EmailConflict | Self::UnameConflict | Self::TooMuchData => {
                StatusCode::CONFLICT
            }
            Self::MailNotSent | Self::DevMessedUp => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Bare envelope: code and message only.
    pub fn reply(self) -> HttpResponse {
        HttpResponse::build(self.status()).json(serde_json::json!({
            "code": self,
            "message": self.message(),
        }))
    }

    /// Envelope with extra payload fields merged in beside code and message.
    pub fn with(self, payload: serde_json::Value) -> HttpResponse {
        let mut body = serde_json::json!({
            "code": self,
            "message": self.message(),
        });
        if let (Some(body), Some(extra)) = (body.as_object_mut(), payload.as_object()) {
            for (key, value) in extra {
                body.insert(key.clone(), value.clone());
            }
        }
        HttpResponse::build(self.status()).json(body)
    }
}

/// Catch-all for backend failures. Logs the cause, reports nothing of it.
pub fn oops(e: impl std::fmt::Display) -> HttpResponse {
    log::error!("unexpected backend failure: {}", e);
    Code::DevMessedUp.reply()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_serialize_to_wire_spelling() {
        let spell = |code: Code| serde_json::to_value(code).expect("serialize");
        assert_eq!(spell(Code::Okay), "OKAY");
        assert_eq!(spell(Code::AuthRequired), "AUTH_REQUIRED");
        assert_eq!(spell(Code::VerificationRequired), "VERIFICATION_REQUIRED");
        assert_eq!(spell(Code::AvCodeNotValid), "AV_CODE_NOT_VALID");
        assert_eq!(spell(Code::UnameConflict), "UNAME_CONFLICT");
        assert_eq!(spell(Code::NoCardsInDeck), "NO_CARDS_IN_DECK");
        assert_eq!(spell(Code::DevMessedUp), "DEV_MESSED_UP");
    }

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(Code::Okay.status(), StatusCode::OK);
        assert_eq!(Code::NoCardsInDeck.status(), StatusCode::OK);
        assert_eq!(Code::Validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(Code::AuthRequired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(Code::AccessDenied.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(Code::DeckNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(Code::Queue.status(), StatusCode::CONFLICT);
        assert_eq!(Code::DevMessedUp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn every_code_carries_a_message() {
        let codes = [
            Code::Okay,
            Code::Validation,
            Code::AuthRequired,
            Code::VerificationRequired,
            Code::AccessDenied,
            Code::UserNotFound,
            Code::DeckNotFound,
            Code::CardNotFound,
            Code::Queue,
            Code::EmailConflict,
            Code::UnameConflict,
            Code::MailNotSent,
            Code::Verified,
            Code::VerifiedAlready,
            Code::AvCodeNotValid,
            Code::NotSignedIn,
            Code::SignedIn,
            Code::TooMuchData,
            Code::NoCardsInDeck,
            Code::DevMessedUp,
        ];
        for code in codes {
            assert!(!code.message().is_empty());
        }
    }
}
