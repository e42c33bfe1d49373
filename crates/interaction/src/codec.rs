//! Wire codec for the pending-interaction slot.
//!
//! Format: `"/{OpCode}_{OriginMessageId}={Payload}"`. The first `_`
//! separates the opcode tag from the message id; the first `=` (if
//! any) separates the id from the payload, which may itself contain
//! `=`. A trailing `=` with nothing after it is an *empty* payload,
//! which is distinct from no `=` at all (no payload) — flows give the
//! two shapes different meanings.
//!
//! Payloads must not contain `_` before the first `=`; that is a
//! data-model restriction on what callers may arm, not enforced here.

use sf_domain::MessageId;

use crate::opcode::FlowOpcode;

/// One pending free-input interaction, as carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingInteraction {
    pub opcode: FlowOpcode,
    /// The prompt message to delete/replace once the interaction
    /// resolves.
    pub origin_message: MessageId,
    /// Flow-specific context. `Some("")` and `None` are distinct.
    pub payload: Option<String>,
}

impl PendingInteraction {
    /// Render the slot to its wire string. Exactly reversible by
    /// [`decode`] for any payload the data model allows.
    pub fn encode(&self) -> String {
        let head = format!("/{}_{}", self.opcode.wire(), self.origin_message);
        match &self.payload {
            None => head,
            Some(payload) => format!("{head}={payload}"),
        }
    }
}

/// Why a slot failed the format contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotFault {
    /// No `_` delimiter between opcode tag and message id.
    MissingDelimiter,
    /// The opcode tag is not the literal `/{expected}`. Mismatch and
    /// garbage are treated identically: the slot is unrecoverable.
    OpcodeMismatch,
    /// The message-id segment is not a positive integer.
    BadMessageId,
}

impl SlotFault {
    pub fn describe(self) -> &'static str {
        match self {
            Self::MissingDelimiter => "missing '_' delimiter",
            Self::OpcodeMismatch => "opcode mismatch",
            Self::BadMessageId => "message id is not a positive integer",
        }
    }
}

/// Three-valued decode result. "No interaction pending" is a normal
/// state, not an error, and callers must handle it without a catch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// Nothing stored (or the entry expired).
    Vacant,
    /// Stored, but violating the format contract. Never partially
    /// trusted.
    Malformed(SlotFault),
    /// Stored and well-formed for the expected flow.
    Pending(PendingInteraction),
}

/// Decode a raw stored value against the opcode the continuation
/// expects.
pub fn decode(raw: Option<&str>, expected: FlowOpcode) -> Slot {
    let raw = match raw {
        None | Some("") => return Slot::Vacant,
        Some(raw) => raw,
    };

    let Some((tag, rest)) = raw.split_once('_') else {
        return Slot::Malformed(SlotFault::MissingDelimiter);
    };

    if tag != format!("/{}", expected.wire()) {
        return Slot::Malformed(SlotFault::OpcodeMismatch);
    }

    let (id_part, payload) = match rest.split_once('=') {
        Some((id_part, payload)) => (id_part, Some(payload.to_owned())),
        None => (rest, None),
    };

    match id_part.parse::<i64>() {
        Ok(id) if id > 0 => Slot::Pending(PendingInteraction {
            opcode: expected,
            origin_message: MessageId(id),
            payload,
        }),
        _ => Slot::Malformed(SlotFault::BadMessageId),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(opcode: FlowOpcode, id: i64, payload: Option<&str>) -> PendingInteraction {
        PendingInteraction {
            opcode,
            origin_message: MessageId(id),
            payload: payload.map(str::to_owned),
        }
    }

    #[test]
    fn encode_matches_observed_wire_strings() {
        assert_eq!(
            pending(FlowOpcode::PhoneUpdate, 501, Some("")).encode(),
            "/33554432_501="
        );
        assert_eq!(pending(FlowOpcode::Review, 900, None).encode(), "/67108864_900");
        assert_eq!(
            pending(FlowOpcode::Review, 900, Some("d7f1")).encode(),
            "/67108864_900=d7f1"
        );
    }

    #[test]
    fn round_trip_all_payload_shapes() {
        let cases = [
            pending(FlowOpcode::NameSearch, 1, None),
            pending(FlowOpcode::NameSearch, 1, Some("")),
            pending(FlowOpcode::PhoneUpdate, 42, Some("seed")),
            pending(FlowOpcode::OrderComment, 9999, Some("pickup=fast")),
        ];
        for case in cases {
            let decoded = decode(Some(&case.encode()), case.opcode);
            assert_eq!(decoded, Slot::Pending(case));
        }
    }

    #[test]
    fn payload_keeps_embedded_equals_signs() {
        let slot = decode(Some("/65536_10=a=b=c"), FlowOpcode::NameSearch);
        match slot {
            Slot::Pending(p) => assert_eq!(p.payload.as_deref(), Some("a=b=c")),
            other => panic!("expected pending, got {other:?}"),
        }
    }

    #[test]
    fn absent_and_empty_are_vacant() {
        assert_eq!(decode(None, FlowOpcode::Review), Slot::Vacant);
        assert_eq!(decode(Some(""), FlowOpcode::Review), Slot::Vacant);
    }

    #[test]
    fn missing_underscore_is_malformed() {
        assert_eq!(
            decode(Some("/33554432"), FlowOpcode::PhoneUpdate),
            Slot::Malformed(SlotFault::MissingDelimiter)
        );
    }

    #[test]
    fn wrong_opcode_never_silently_succeeds() {
        // A phone slot read by the review continuation is fatal.
        assert_eq!(
            decode(Some("/33554432_501="), FlowOpcode::Review),
            Slot::Malformed(SlotFault::OpcodeMismatch)
        );
        // So is any tag that is not the literal expected prefix.
        assert_eq!(
            decode(Some("x33554432_501"), FlowOpcode::PhoneUpdate),
            Slot::Malformed(SlotFault::OpcodeMismatch)
        );
    }

    #[test]
    fn bad_message_ids_are_malformed() {
        for raw in ["/65536_abc", "/65536_0", "/65536_-3", "/65536_=p"] {
            assert_eq!(
                decode(Some(raw), FlowOpcode::NameSearch),
                Slot::Malformed(SlotFault::BadMessageId),
                "raw = {raw}"
            );
        }
    }
}
