//! Deterministic ordering of the active selection set.

use crate::domain::model::Selection;

/// Order selections top-to-bottom, then left-to-right, by their start position.
///
/// The result defines the index alignment between fragments and results for the rest of the
/// pipeline, so it must not depend on the order in which the editor reported the selections.
pub fn normalize(selections: &[Selection]) -> Vec<Selection> {
    let mut ordered = selections.to_vec();
    ordered.sort_by(|a, b| {
        a.start()
            .line
            .cmp(&b.start().line)
            .then(a.start().character.cmp(&b.start().character))
    });
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::model::Position;

    fn at(line: usize, character: usize) -> Selection {
        Selection::new(
            Position::new(line, character),
            Position::new(line, character + 1),
        )
    }

    #[test]
    fn sorts_by_line_then_character() {
        let input = vec![at(4, 2), at(0, 9), at(4, 0), at(2, 5)];
        let ordered = normalize(&input);
        assert_eq!(ordered, vec![at(0, 9), at(2, 5), at(4, 0), at(4, 2)]);
    }

    #[test]
    fn output_is_independent_of_input_order() {
        let forward = vec![at(1, 0), at(1, 3), at(3, 1)];
        let mut reversed = forward.clone();
        reversed.reverse();
        let rotated = vec![forward[1], forward[2], forward[0]];

        let expected = normalize(&forward);
        assert_eq!(normalize(&reversed), expected);
        assert_eq!(normalize(&rotated), expected);
    }

    #[test]
    fn empty_set_stays_empty() {
        assert!(normalize(&[]).is_empty());
    }
}
