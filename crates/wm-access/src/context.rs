//! Per-request caller context.

use wm_core::SuiAddress;
use wm_seal::SessionKey;

/// Who is asking, and with which decryption credential.
///
/// Passed explicitly to every access decision; nothing is read from
/// ambient state.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestContext<'a> {
    /// Connected wallet address, if any.
    pub caller: Option<&'a SuiAddress>,
    /// Session key for premium decryption.
    pub session: Option<&'a SessionKey>,
    /// Transaction bytes proving entitlement to key servers.
    pub tx_bytes: Option<&'a [u8]>,
}

impl<'a> RequestContext<'a> {
    /// No wallet connected.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A connected wallet without a session key.
    pub fn for_caller(caller: &'a SuiAddress) -> Self {
        Self {
            caller: Some(caller),
            ..Self::default()
        }
    }

    /// A connected wallet holding `session`.
    pub fn with_session(session: &'a SessionKey) -> Self {
        Self {
            caller: Some(session.address()),
            session: Some(session),
            tx_bytes: None,
        }
    }

    /// Attach transaction bytes.
    pub fn with_tx_bytes(mut self, tx_bytes: &'a [u8]) -> Self {
        self.tx_bytes = Some(tx_bytes);
        self
    }
}
