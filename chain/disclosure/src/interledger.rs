//! Interledger message types
//!
//! The interledger is an external relay that delivers authenticated
//! approval and disclosure decisions into the coordinator, and carries
//! revealed secrets out of it. Messages cross the boundary as JSON; the
//! coordinator consumes and produces the typed forms below.

use disclosure_types::ids::VulnerabilityId;
use serde::{Deserialize, Serialize};

/// Approval decision delivered by the interledger.
///
/// Canonical wire codes: 0 = Approve, 1 = Invalid, 2 = Duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Approve,
    Invalid,
    Duplicate,
}

impl Decision {
    /// Decode a wire code; unknown codes yield `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Approve),
            1 => Some(Self::Invalid),
            2 => Some(Self::Duplicate),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::Approve => 0,
            Self::Invalid => 1,
            Self::Duplicate => 2,
        }
    }
}

/// Inbound approval payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionMessage {
    pub vulnerability_id: VulnerabilityId,
    pub code: u8,
    /// Free-form auxiliary data (e.g. the decision motivation); not validated.
    #[serde(default)]
    pub aux: String,
}

/// Inbound disclosure payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclosureMessage {
    pub vulnerability_id: VulnerabilityId,
    pub location: String,
}

/// Outbound payload carrying a revealed secret to the other ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRelay {
    pub vulnerability_id: VulnerabilityId,
    pub secret: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_code_round_trip() {
        for decision in [Decision::Approve, Decision::Invalid, Decision::Duplicate] {
            assert_eq!(Decision::from_code(decision.code()), Some(decision));
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert_eq!(Decision::from_code(3), None);
        assert_eq!(Decision::from_code(255), None);
    }

    #[test]
    fn test_decision_message_from_json() {
        let id = VulnerabilityId::from_content(b"report");
        let json = format!(
            "{{\"vulnerability_id\":{},\"code\":0,\"aux\":\"approved\"}}",
            serde_json::to_string(&id).unwrap()
        );
        let msg: DecisionMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(msg.vulnerability_id, id);
        assert_eq!(Decision::from_code(msg.code), Some(Decision::Approve));
        assert_eq!(msg.aux, "approved");
    }

    #[test]
    fn test_decision_message_aux_defaults_empty() {
        let id = VulnerabilityId::from_content(b"report");
        let json = format!(
            "{{\"vulnerability_id\":{},\"code\":2}}",
            serde_json::to_string(&id).unwrap()
        );
        let msg: DecisionMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(msg.aux, "");
    }

    #[test]
    fn test_secret_relay_serialization() {
        let relay = SecretRelay {
            vulnerability_id: VulnerabilityId::from_content(b"report"),
            secret: b"123".to_vec(),
        };
        let json = serde_json::to_string(&relay).unwrap();
        let deser: SecretRelay = serde_json::from_str(&json).unwrap();
        assert_eq!(relay, deser);
    }
}
