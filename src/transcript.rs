//! Renders solved river crossings as text.

use std::io::Write;

use crate::problems::river_crossing::Crossing;
use crate::problems::river_crossing::RiverCrossingSpace;
use crate::problems::river_crossing::RiverCrossingState;
use crate::space::Path;

pub type RiverCrossingPath = Path<RiverCrossingState, Crossing>;

/// Writes where everybody stands after each move, and who moved.
///
/// Moves are described from the difference between consecutive States, the
/// recorded Crossing is only used if that difference isn't a single crossing.
pub fn write_transcript<W: Write>(
    out: &mut W,
    space: &RiverCrossingSpace,
    path: &RiverCrossingPath,
) -> std::io::Result<()> {
    writeln!(out, "Step 0: {}", space.display_state(&path.start()))?;
    for (i, (from, recorded, to)) in path.steps().enumerate() {
        let crossing = space.crossing_between(from, to).unwrap_or(*recorded);
        writeln!(out, "  -> {}", space.describe(&crossing))?;
        writeln!(out, "Step {}: {}", i + 1, space.display_state(to))?;
    }
    writeln!(out, "Total moves: {}", path.len())
}

/// Writes one numbered line per move.
pub fn write_moves<W: Write>(
    out: &mut W,
    space: &RiverCrossingSpace,
    path: &RiverCrossingPath,
) -> std::io::Result<()> {
    for (i, c) in path.actions().iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, space.describe(c))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::algorithms::bfs::solve;
    use crate::problems::river_crossing::RiverCrossingProblem;

    fn classic() -> (RiverCrossingSpace, RiverCrossingPath) {
        let space = RiverCrossingSpace::classic();
        let path = solve(RiverCrossingProblem::classic()).unwrap();
        (space, path)
    }

    #[test]
    fn classic_transcript() {
        let (space, path) = classic();
        let mut out = Vec::new();
        write_transcript(&mut out, &space, &path).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            indoc! {"
                Step 0: Origin: Farmer, Fox, Goose, Grain | Destination: (empty)
                  -> Farmer takes Goose to the destination bank
                Step 1: Origin: Fox, Grain | Destination: Farmer, Goose
                  -> Farmer crosses alone to the origin bank
                Step 2: Origin: Farmer, Fox, Grain | Destination: Goose
                  -> Farmer takes Fox to the destination bank
                Step 3: Origin: Grain | Destination: Farmer, Fox, Goose
                  -> Farmer takes Goose to the origin bank
                Step 4: Origin: Farmer, Goose, Grain | Destination: Fox
                  -> Farmer takes Grain to the destination bank
                Step 5: Origin: Goose | Destination: Farmer, Fox, Grain
                  -> Farmer crosses alone to the origin bank
                Step 6: Origin: Farmer, Goose | Destination: Fox, Grain
                  -> Farmer takes Goose to the destination bank
                Step 7: Origin: (empty) | Destination: Farmer, Fox, Goose, Grain
                Total moves: 7
            "}
        );
    }

    #[test]
    fn empty_transcript() {
        let space = RiverCrossingSpace::classic();
        let path = RiverCrossingPath::new_from_start(RiverCrossingProblem::classic().start());
        let mut out = Vec::new();
        write_transcript(&mut out, &space, &path).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            indoc! {"
                Step 0: Origin: Farmer, Fox, Goose, Grain | Destination: (empty)
                Total moves: 0
            "}
        );
    }

    #[test]
    fn numbered_moves() {
        let (space, path) = classic();
        let mut out = Vec::new();
        write_moves(&mut out, &space, &path).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.lines().count(), 7);
        assert!(out.starts_with("1. Farmer takes Goose to the destination bank\n"));
        assert!(out.ends_with("7. Farmer takes Goose to the destination bank\n"));
    }
}
