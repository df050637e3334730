use crate::data::{Dir, MapCell, Pos, DIRECTIONS};
use crate::map::GoalMap;
use crate::vec2d::Vec2d;

/// Marks cells where a box can never reach a goal again.
///
/// Only free non-goal cells can be marked. A cell is a dead end if it's a corner
/// (a wall on at least one vertical and one horizontal side) or if it lies along a straight wall
/// which can't be left in the direction of the wall's run without reaching a goal first.
///
/// The analysis only looks at walls and goals so it's never wrong about a dead end
/// but it doesn't find all of them.
#[inline(never)] // this is called only once and this way it's easier to see in callgrind
pub(crate) fn find_dead_ends(map: &GoalMap) -> Vec2d<bool> {
    let mut dead_ends = map.grid.scratchpad();
    for pos in map.grid.positions() {
        if map.grid[pos] != MapCell::Empty {
            continue;
        }
        if is_corner(map, pos) || is_walled_corridor(map, pos) {
            dead_ends[pos] = true;
        }
    }
    dead_ends
}

fn is_corner(map: &GoalMap, pos: Pos) -> bool {
    let vertical = map.is_wall(pos + Dir::Up) || map.is_wall(pos + Dir::Down);
    let horizontal = map.is_wall(pos + Dir::Left) || map.is_wall(pos + Dir::Right);
    vertical && horizontal
}

fn is_walled_corridor(map: &GoalMap, pos: Pos) -> bool {
    DIRECTIONS
        .iter()
        .filter(|&&side| map.is_wall(pos + side))
        .any(|&side| {
            let (back, forth) = along(side);
            let (first, last) = match (bound(map, pos, back), bound(map, pos, forth)) {
                (Some(first), Some(last)) => (first, last),
                // a goal is reachable along the wall
                _ => return false,
            };

            // every cell strictly between the bounds needs a wall on the same side
            let mut cur = first + forth;
            while cur != last {
                if !map.is_wall(cur + side) {
                    return false;
                }
                cur = cur + forth;
            }
            true
        })
}

/// The two directions parallel to a wall on the given side.
fn along(side: Dir) -> (Dir, Dir) {
    match side {
        Dir::Up | Dir::Down => (Dir::Left, Dir::Right),
        Dir::Left | Dir::Right => (Dir::Up, Dir::Down),
    }
}

/// Walks from `pos` in `dir` until the first wall or the edge of the map
/// and returns the position where it stopped. `None` if a goal is on the way.
fn bound(map: &GoalMap, pos: Pos, dir: Dir) -> Option<Pos> {
    let mut cur = pos + dir;
    loop {
        if !map.contains(cur) || map.is_wall(cur) {
            return Some(cur);
        }
        if map.is_goal(cur) {
            return None;
        }
        cur = cur + dir;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;

    fn dead_ends_of(xsb: &str) -> String {
        let level: Level = xsb.parse().unwrap();
        find_dead_ends(&level.map).to_string()
    }

    #[test]
    fn corners() {
        let level = r"
#####
##@##
##$##
#  .#
#####
";
        let expected = "\
00000
00100
00000
01000
00000
";
        assert_eq!(dead_ends_of(level), expected);
    }

    #[test]
    fn walled_corridors() {
        let level = r"
#######
#     #
# $ @ #
#.    #
#######
";
        // the bottom row leads to the goal, the other edges don't
        let expected = "\
0000000
0111110
0000010
0000010
0000000
";
        assert_eq!(dead_ends_of(level), expected);
    }

    #[test]
    fn gap_in_wall() {
        let level = r"
## ####
#     #
# $ @ #
#.    #
#######
";
        // a box in the top row can still be pushed out through the gap
        let expected = "\
0000000
0100010
0000010
0000010
0000000
";
        assert_eq!(dead_ends_of(level), expected);
    }

    #[test]
    fn tunnel_with_dead_floor() {
        let level = r"
#########
#.@$    #
#   ### #
#       #
#########
";
        // the tunnel has walls above and below, the wall below
        // runs along the whole row so none of it is reachable from a goal
        let expected = "\
000000000
000000010
000000010
011111110
000000000
";
        assert_eq!(dead_ends_of(level), expected);
    }

    #[test]
    fn goals_and_walls_never_dead() {
        let level: Level = r"
#########
#.  #  .#
#  $@$  #
#.  #  .#
#########
"
        .parse()
        .unwrap();
        let dead_ends = find_dead_ends(&level.map);
        for pos in dead_ends.positions().filter(|&pos| dead_ends[pos]) {
            assert!(!level.map.is_wall(pos), "{} is a wall", pos);
            assert!(!level.map.is_goal(pos), "{} is a goal", pos);
        }
        assert!(!dead_ends[Pos::new(3, 3)]);
    }
}
