use perch_common::TargetSeat;

/// A high-level action produced from pointer or key input.
///
/// The session applies actions to the transition state machine; it never
/// looks at raw input events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Sit down where the avatar stands.
    SitDown,
    /// Stand up from the current seat.
    StandUp,
    /// Walk to a seat, turn to face it, then sit down.
    GoToSeat(TargetSeat),
    /// Input that maps to nothing.
    Noop,
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn action_go_to_seat_carries_target() {
        let seat = TargetSeat {
            position: Vec3::new(1.0, 0.0, 2.0),
            orientation: Quat::IDENTITY,
        };
        let a = Action::GoToSeat(seat);
        assert!(matches!(a, Action::GoToSeat(s) if s == seat));
    }

    #[test]
    fn action_sit_stand() {
        assert!(matches!(Action::SitDown, Action::SitDown));
        assert!(matches!(Action::StandUp, Action::StandUp));
        assert_ne!(Action::SitDown, Action::Noop);
    }
}
