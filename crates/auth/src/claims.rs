use super::*;
use cardbox_core::ID;

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: uuid::Uuid,
    pub usr: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(account: ID<Account>, username: String) -> Self {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time")
            .as_secs() as i64;
        Self {
            sub: account.inner(),
            usr: username,
            iat: now,
            exp: now + Crypto::duration().as_secs() as i64,
        }
    }
    pub fn expired(&self) -> bool {
        self.exp
            < std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time")
                .as_secs() as i64
    }
    pub fn account(&self) -> ID<Account> {
        ID::from(self.sub)
    }
    pub fn username(&self) -> &str {
        &self.usr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_claims_are_not_expired() {
        let claims = Claims::new(ID::default(), "alice".to_string());
        assert!(!claims.expired());
        assert_eq!(claims.username(), "alice");
    }

    #[test]
    fn past_expiry_is_expired() {
        let mut claims = Claims::new(ID::default(), "alice".to_string());
        claims.exp = claims.iat - 1;
        assert!(claims.expired());
    }

    #[test]
    fn account_roundtrips_through_sub() {
        let id = ID::<Account>::default();
        let claims = Claims::new(id, "alice".to_string());
        assert_eq!(claims.account(), id);
    }
}
