use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Edge of a card an arrow leaves from or arrives at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];
}

/// A directed arrow between two deliveries, referenced by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub id: Uuid,
    pub from_item_id: Uuid,
    pub from_side: Side,
    pub to_item_id: Uuid,
    pub to_side: Side,
    /// Optional condition text drawn at the middle of the arrow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Connection {
    pub fn new(from_item_id: Uuid, from_side: Side, to_item_id: Uuid, to_side: Side) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_item_id,
            from_side,
            to_item_id,
            to_side,
            label: None,
        }
    }

    pub fn involves(&self, item_id: Uuid) -> bool {
        self.from_item_id == item_id || self.to_item_id == item_id
    }

    /// Same endpoints and sides, ignoring id and label.
    pub fn same_route(&self, other: &Connection) -> bool {
        self.from_item_id == other.from_item_id
            && self.from_side == other.from_side
            && self.to_item_id == other.to_item_id
            && self.to_side == other.to_side
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn involves_either_endpoint() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let conn = Connection::new(a, Side::Right, b, Side::Left);
        assert!(conn.involves(a));
        assert!(conn.involves(b));
        assert!(!conn.involves(c));
    }

    #[test]
    fn same_route_ignores_id_and_label() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let first = Connection::new(a, Side::Right, b, Side::Left);
        let mut second = Connection::new(a, Side::Right, b, Side::Left);
        second.label = Some("clicked".into());
        assert!(first.same_route(&second));
        assert!(!first.same_route(&Connection::new(a, Side::Bottom, b, Side::Left)));
    }
}
