//! Household membership.

use hearth_shared::types::{HouseholdId, MemberId};
use serde::{Deserialize, Serialize};

/// A group of members sharing chores and expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Household {
    /// Household ID.
    pub id: HouseholdId,
    /// Display name.
    pub name: String,
    /// Member who created the household.
    pub owner: MemberId,
    /// Members in join order. May or may not contain the owner.
    pub members: Vec<MemberId>,
}

impl Household {
    /// Returns true if the given member is a member or the owner of this household.
    #[must_use]
    pub fn includes(&self, member: MemberId) -> bool {
        self.owner == member || self.members.contains(&member)
    }

    /// Members taking part in chore rotation: every member in join order,
    /// followed by the owner when the owner has not joined as a member.
    #[must_use]
    pub fn rotation_members(&self) -> Vec<MemberId> {
        let mut rotation = self.members.clone();
        if !rotation.contains(&self.owner) {
            rotation.push(self.owner);
        }
        rotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn household(owner: MemberId, members: Vec<MemberId>) -> Household {
        Household {
            id: HouseholdId::new(),
            name: "Flat 4B".to_string(),
            owner,
            members,
        }
    }

    #[test]
    fn test_includes_owner_and_members() {
        let owner = MemberId::new();
        let member = MemberId::new();
        let stranger = MemberId::new();
        let home = household(owner, vec![member]);

        assert!(home.includes(owner));
        assert!(home.includes(member));
        assert!(!home.includes(stranger));
    }

    #[test]
    fn test_rotation_appends_owner_once() {
        let owner = MemberId::new();
        let a = MemberId::new();
        let b = MemberId::new();

        assert_eq!(household(owner, vec![a, b]).rotation_members(), vec![a, b, owner]);
        assert_eq!(household(owner, vec![a, owner, b]).rotation_members(), vec![a, owner, b]);
        assert_eq!(household(owner, vec![]).rotation_members(), vec![owner]);
    }
}
