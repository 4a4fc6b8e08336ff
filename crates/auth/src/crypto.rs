use super::*;

const ACCESS_TOKEN_DURATION: std::time::Duration = std::time::Duration::from_secs(15 * 60);

pub struct Crypto {
    encoding: jsonwebtoken::EncodingKey,
    decoding: jsonwebtoken::DecodingKey,
}

impl Crypto {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: jsonwebtoken::EncodingKey::from_secret(secret),
            decoding: jsonwebtoken::DecodingKey::from_secret(secret),
        }
    }
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| String::default())
                .as_bytes(),
        )
    }
    pub fn encode(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), claims, &self.encoding)
    }
    pub fn decode(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &jsonwebtoken::Validation::default())
            .map(|data| data.claims)
    }
    pub const fn duration() -> std::time::Duration {
        ACCESS_TOKEN_DURATION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardbox_core::ID;

    #[test]
    fn encode_decode_roundtrip() {
        let crypto = Crypto::new(b"test-secret");
        let claims = Claims::new(ID::default(), "alice".to_string());
        let token = crypto.encode(&claims).expect("encode");
        let decoded = crypto.decode(&token).expect("decode");
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.usr, claims.usr);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let claims = Claims::new(ID::default(), "alice".to_string());
        let token = Crypto::new(b"one").encode(&claims).expect("encode");
        assert!(Crypto::new(b"two").decode(&token).is_err());
    }
}
