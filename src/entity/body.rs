//! Physical body composition

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartType {
    Head,
    Torso,
    Hand,
    Leg,
}

/// The parts an actor's body is made of
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    parts: Vec<PartType>,
}

impl Body {
    pub fn new(parts: Vec<PartType>) -> Self {
        Self { parts }
    }

    /// Head, torso, two hands, two legs
    pub fn humanoid() -> Self {
        Self::new(vec![
            PartType::Head,
            PartType::Torso,
            PartType::Hand,
            PartType::Hand,
            PartType::Leg,
            PartType::Leg,
        ])
    }

    pub fn has_body_part(&self, part: PartType) -> bool {
        self.parts.contains(&part)
    }

}
