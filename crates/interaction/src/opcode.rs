//! The closed set of flows that may own a pending-interaction slot.
//!
//! Wire values live in a power-of-two-style namespace so future opcodes
//! can be added without collision, but comparison is always exact-match
//! — nothing composes them bitwise. Internal code never touches the
//! raw integers; they exist only at the codec boundary.

/// Which conversational flow owns a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowOpcode {
    /// Product search by free-text name.
    NameSearch,
    /// Phone-number update.
    PhoneUpdate,
    /// Store review authoring.
    Review,
    /// Order comment / delivery-method confirmation.
    OrderComment,
}

impl FlowOpcode {
    pub const ALL: [Self; 4] = [
        Self::NameSearch,
        Self::PhoneUpdate,
        Self::Review,
        Self::OrderComment,
    ];

    /// Integer value used on the wire.
    pub fn wire(self) -> u32 {
        match self {
            Self::NameSearch => 65_536,
            Self::PhoneUpdate => 33_554_432,
            Self::Review => 67_108_864,
            Self::OrderComment => 1_000_000_100,
        }
    }

    /// Map a wire value back to an opcode. Exact match only.
    pub fn from_wire(value: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.wire() == value)
    }

    /// Read just the `/{opcode}_` prefix of a raw slot to learn which
    /// flow owns it. Used for routing free text; the owning flow's
    /// decode still enforces the full format contract afterwards.
    pub fn sniff(raw: &str) -> Option<Self> {
        let tagged = raw.strip_prefix('/')?;
        let (head, _) = tagged.split_once('_')?;
        head.parse::<u32>().ok().and_then(Self::from_wire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values_round_trip() {
        for op in FlowOpcode::ALL {
            assert_eq!(FlowOpcode::from_wire(op.wire()), Some(op));
        }
    }

    #[test]
    fn unknown_wire_value_is_rejected() {
        assert_eq!(FlowOpcode::from_wire(12345), None);
    }

    #[test]
    fn sniff_reads_the_owning_flow() {
        assert_eq!(
            FlowOpcode::sniff("/33554432_501="),
            Some(FlowOpcode::PhoneUpdate)
        );
        assert_eq!(
            FlowOpcode::sniff("/67108864_900"),
            Some(FlowOpcode::Review)
        );
    }

    #[test]
    fn sniff_rejects_garbage() {
        assert_eq!(FlowOpcode::sniff(""), None);
        assert_eq!(FlowOpcode::sniff("33554432_501"), None);
        assert_eq!(FlowOpcode::sniff("/notanumber_501"), None);
        assert_eq!(FlowOpcode::sniff("/99_501"), None);
    }
}
