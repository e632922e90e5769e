use crate::types::{Facing, Tile};

/// Fixed-period step accumulator fed with wall-clock milliseconds.
#[derive(Clone, Debug)]
pub(super) struct Cadence {
    period_ms: u64,
    accumulated_ms: u64,
}

impl Cadence {
    pub(super) fn new(period_ms: u64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            accumulated_ms: 0,
        }
    }

    /// Adds elapsed time and returns how many whole steps are now due.
    pub(super) fn advance(&mut self, elapsed_ms: u64) -> u64 {
        self.accumulated_ms = self.accumulated_ms.saturating_add(elapsed_ms);
        let steps = self.accumulated_ms / self.period_ms;
        self.accumulated_ms %= self.period_ms;
        steps
    }
}

/// (corner tile, incoming facing, outgoing facing). Corners are named by the
/// two walls they close.
const ICE_DEFLECTIONS: [(Tile, Facing, Facing); 8] = [
    (Tile::IceSouthEast, Facing::East, Facing::North),
    (Tile::IceSouthEast, Facing::South, Facing::West),
    (Tile::IceSouthWest, Facing::West, Facing::North),
    (Tile::IceSouthWest, Facing::South, Facing::East),
    (Tile::IceNorthWest, Facing::West, Facing::South),
    (Tile::IceNorthWest, Facing::North, Facing::East),
    (Tile::IceNorthEast, Facing::East, Facing::South),
    (Tile::IceNorthEast, Facing::North, Facing::West),
];

pub(super) fn slide_direction(tile: Tile, facing: Facing) -> Facing {
    ICE_DEFLECTIONS
        .iter()
        .find(|(corner, incoming, _)| *corner == tile && *incoming == facing)
        .map(|(_, _, outgoing)| *outgoing)
        .unwrap_or(facing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cadence_keeps_the_remainder() {
        let mut cadence = Cadence::new(200);
        assert_eq!(cadence.advance(450), 2);
        assert_eq!(cadence.advance(100), 0);
        assert_eq!(cadence.advance(50), 1);
        assert_eq!(cadence.advance(0), 0);
    }

    #[test]
    fn cadence_fires_many_steps_after_a_long_frame() {
        let mut cadence = Cadence::new(100);
        assert_eq!(cadence.advance(1_050), 10);
        assert_eq!(cadence.advance(50), 1);
    }

    #[test]
    fn straight_ice_keeps_facing() {
        for facing in Facing::ALL {
            assert_eq!(slide_direction(Tile::Ice, facing), facing);
        }
    }

    #[test]
    fn corners_deflect_incoming_and_pass_outgoing() {
        assert_eq!(slide_direction(Tile::IceSouthEast, Facing::East), Facing::North);
        assert_eq!(slide_direction(Tile::IceSouthEast, Facing::South), Facing::West);
        assert_eq!(slide_direction(Tile::IceSouthEast, Facing::North), Facing::North);
        assert_eq!(slide_direction(Tile::IceNorthWest, Facing::North), Facing::East);
        assert_eq!(slide_direction(Tile::IceNorthEast, Facing::East), Facing::South);
        assert_eq!(slide_direction(Tile::IceSouthWest, Facing::West), Facing::North);
    }
}
