use crate::config::HeuristicKind;
use crate::data::Pos;
use crate::map::GoalMap;
use crate::solver::puzzle_state::PuzzleState;

/// Distance from the player to the closest box
/// plus, for each box, the distance to its closest goal.
///
/// Goals aren't assigned exclusively, several boxes can count the same goal.
/// Not admissible: the player term can overestimate.
pub(crate) fn estimate(kind: HeuristicKind, state: &PuzzleState<'_>) -> f64 {
    let map = &state.sd().map;
    match kind {
        HeuristicKind::Manhattan => sum_of_nearest(map, state.player_pos(), state.boxes(), |a, b| {
            f64::from(a.manhattan(b))
        }),
        HeuristicKind::Euclidean => {
            sum_of_nearest(map, state.player_pos(), state.boxes(), Pos::euclidean)
        }
    }
}

fn sum_of_nearest<D>(map: &GoalMap, player_pos: Pos, boxes: &[Pos], dist: D) -> f64
where
    D: Fn(Pos, Pos) -> f64,
{
    let closest_box = boxes
        .iter()
        .map(|&b| dist(player_pos, b))
        .fold(None, |min: Option<f64>, d| Some(min.map_or(d, |m| m.min(d))))
        .unwrap_or(0.0);

    let mut goal_dist_sum = 0.0;
    for &box_pos in boxes {
        let nearest = map
            .goals()
            .iter()
            .map(|&goal| dist(box_pos, goal))
            .fold(None, |min: Option<f64>, d| Some(min.map_or(d, |m| m.min(d))));
        if let Some(nearest) = nearest {
            goal_dist_sum += nearest;
        }
    }

    closest_box + goal_dist_sum
}

#[cfg(test)]
mod tests {
    use typed_arena::Arena;

    use super::*;
    use crate::level::Level;
    use crate::solver::puzzle_state::SearchSpace;
    use crate::solver::StaticData;

    #[test]
    fn distances() {
        let level: Level = r"
#######
#@ $ .#
#     #
#.$   #
#######
"
        .parse()
        .unwrap();
        let sd = StaticData::new(level.map.clone());
        let arena = Arena::new();
        let space = SearchSpace::new(&sd, &arena);
        let root = PuzzleState::root(&space, &level.state);

        // closest box (2, 4) is 2 away, box (2, 4) -> goal (2, 6) is 2, box (4, 3) -> goal (4, 2) is 1
        assert_eq!(estimate(HeuristicKind::Manhattan, &root), 5.0);
        // box (4, 3) is at distance sqrt(5) from the player so (2, 4) is still closest
        assert_eq!(estimate(HeuristicKind::Euclidean, &root), 5.0);
    }

    #[test]
    fn solved_and_empty() {
        let map: Level = r"
####
#@*#
####
"
        .parse()
        .unwrap();
        // player next to the only box which is already on a goal
        assert_eq!(
            sum_of_nearest(&map.map, Pos::new(2, 2), &[Pos::new(2, 3)], |a, b| f64::from(
                a.manhattan(b)
            )),
            1.0
        );
        assert_eq!(
            sum_of_nearest(&map.map, Pos::new(2, 2), &[], Pos::euclidean),
            0.0
        );
    }
}
