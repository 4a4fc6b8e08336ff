/// Verification mail hand-off.
///
/// Delivery is an external collaborator: the caller hands over an address
/// and a verification code and moves on. A failure here still leaves the
/// account created — the caller reports it as mail-not-sent.
pub trait Mailer {
    fn deliver(&self, email: &str, code: &str) -> anyhow::Result<()>;
}

/// Shipped implementation: writes the verification link to the log.
/// Actual SMTP infrastructure is out of scope.
pub struct Outbox;

impl Mailer for Outbox {
    fn deliver(&self, email: &str, code: &str) -> anyhow::Result<()> {
        log::info!(
            "verification mail for {}: /signup-verify?code={}",
            email,
            code
        );
        Ok(())
    }
}
