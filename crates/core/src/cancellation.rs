//! Cooperative cancellation for storage and publish operations
//!
//! Every suspension point (storage read/write, event publish) accepts a
//! [`CancellationToken`]; if the token is already cancelled on entry, the
//! operation fails fast with [`Error::Cancelled`] rather than doing any
//! work. This mirrors the original service's `if ctx.Err() ==
//! context.Canceled` guard at the top of every repository method.

use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Fails fast with [`Error::Cancelled`] if `token` has already fired.
pub fn ensure_not_cancelled(token: &CancellationToken) -> Result<()> {
    if token.is_cancelled() {
        return Err(Error::Cancelled);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_when_not_cancelled() {
        let token = CancellationToken::new();
        assert!(ensure_not_cancelled(&token).is_ok());
    }

    #[test]
    fn fails_fast_when_already_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        assert!(matches!(
            ensure_not_cancelled(&token),
            Err(Error::Cancelled)
        ));
    }
}
