//! The demo warehouse board.
//!
//! A `width` by `height` grid with two robots, seeded packages, and
//! charge stations. Robots always start in opposite corners; only
//! package and station placement consumes the seed, so corner moves
//! stay legal for every seed.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Credits earned for a completed delivery
pub const DELIVERY_REWARD: i64 = 10;

/// Battery gained per credit spent at a charge station
pub const CHARGE_YIELD: i32 = 5;

/// Battery each robot starts with
pub const INITIAL_BATTERY: i32 = 20;

/// One robot on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    /// Grid position
    pub position: (i32, i32),
    /// Remaining battery; each move costs one
    pub battery: i32,
    /// Earned credits
    pub credits: i64,
    /// Index into [`Board::packages`] while hauling
    pub carrying: Option<usize>,
}

/// One package on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Current position (frozen while picked up)
    pub position: (i32, i32),
    /// Delivery destination
    pub destination: (i32, i32),
    /// Whether a robot currently holds it
    pub picked: bool,
    /// Whether it reached its destination
    pub delivered: bool,
}

/// The shared board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Grid width
    pub width: i32,
    /// Grid height
    pub height: i32,
    /// Robots in seat order
    pub robots: Vec<Robot>,
    /// Packages awaiting or under delivery
    pub packages: Vec<Package>,
    /// Charge station positions
    pub charge_stations: Vec<(i32, i32)>,
}

impl Board {
    /// Generate a 5x5 board from a seed: robots in opposite corners,
    /// two packages and two charge stations on distinct free cells
    #[must_use]
    pub fn generate(seed: u64) -> Self {
        let width = 5;
        let height = 5;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let corners = [(0, 0), (width - 1, height - 1)];
        let mut taken: Vec<(i32, i32)> = corners.to_vec();
        let free_cell = |rng: &mut ChaCha8Rng, taken: &mut Vec<(i32, i32)>| loop {
            let cell = (rng.gen_range(0..width), rng.gen_range(0..height));
            if !taken.contains(&cell) {
                taken.push(cell);
                break cell;
            }
        };

        let packages = (0..2)
            .map(|_| {
                let position = free_cell(&mut rng, &mut taken);
                let destination = free_cell(&mut rng, &mut taken);
                Package {
                    position,
                    destination,
                    picked: false,
                    delivered: false,
                }
            })
            .collect();
        let charge_stations = (0..2).map(|_| free_cell(&mut rng, &mut taken)).collect();

        Self {
            width,
            height,
            robots: corners
                .iter()
                .map(|&position| Robot {
                    position,
                    battery: INITIAL_BATTERY,
                    credits: 0,
                    carrying: None,
                })
                .collect(),
            packages,
            charge_stations,
        }
    }

    /// An empty board with robots in opposite corners and nothing else
    #[must_use]
    pub fn bare(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            robots: vec![
                Robot {
                    position: (0, 0),
                    battery: INITIAL_BATTERY,
                    credits: 0,
                    carrying: None,
                },
                Robot {
                    position: (width - 1, height - 1),
                    battery: INITIAL_BATTERY,
                    credits: 0,
                    carrying: None,
                },
            ],
            packages: Vec::new(),
            charge_stations: Vec::new(),
        }
    }

    /// Credit balances in seat order
    #[must_use]
    pub fn balances(&self) -> Vec<i64> {
        self.robots.iter().map(|r| r.credits).collect()
    }

    /// Operators legal for `seat` on this board
    #[must_use]
    pub fn legal_operators(&self, seat: usize) -> Vec<String> {
        let Some(robot) = self.robots.get(seat) else {
            return Vec::new();
        };
        let mut ops = vec!["park".to_string()];

        if robot.battery > 0 {
            for (op, delta) in MOVES {
                let target = (robot.position.0 + delta.0, robot.position.1 + delta.1);
                if self.in_bounds(target) && !self.occupied(target) {
                    ops.push((*op).to_string());
                }
            }
        }
        if robot.carrying.is_none()
            && self.packages.iter().any(|p| {
                !p.picked && !p.delivered && p.position == robot.position
            })
        {
            ops.push("pick up".to_string());
        }
        if let Some(package) = robot.carrying.and_then(|i| self.packages.get(i)) {
            if package.destination == robot.position {
                ops.push("drop off".to_string());
            }
        }
        if robot.credits > 0 && self.charge_stations.contains(&robot.position) {
            ops.push("charge".to_string());
        }
        ops
    }

    /// Apply a legal operator, returning the successor board.
    ///
    /// Callers must check [`Self::legal_operators`] first; an operator
    /// outside that set returns `None`.
    #[must_use]
    pub fn apply_operator(&self, seat: usize, operator: &str) -> Option<Self> {
        if !self.legal_operators(seat).iter().any(|op| op == operator) {
            return None;
        }
        let mut next = self.clone();
        let robot = &mut next.robots[seat];
        match operator {
            "park" => {}
            "pick up" => {
                let index = next
                    .packages
                    .iter()
                    .position(|p| !p.picked && !p.delivered && p.position == robot.position)?;
                next.packages[index].picked = true;
                next.robots[seat].carrying = Some(index);
            }
            "drop off" => {
                let index = robot.carrying?;
                let destination = next.packages[index].destination;
                next.packages[index].picked = false;
                next.packages[index].delivered = true;
                next.packages[index].position = destination;
                next.robots[seat].carrying = None;
                next.robots[seat].credits += DELIVERY_REWARD;
            }
            "charge" => {
                robot.credits -= 1;
                robot.battery += CHARGE_YIELD;
            }
            _ => {
                let (_, delta) = MOVES.iter().find(|(op, _)| *op == operator)?;
                robot.position.0 += delta.0;
                robot.position.1 += delta.1;
                robot.battery -= 1;
                if let Some(index) = robot.carrying {
                    next.packages[index].position = next.robots[seat].position;
                }
            }
        }
        Some(next)
    }

    fn in_bounds(&self, cell: (i32, i32)) -> bool {
        cell.0 >= 0 && cell.0 < self.width && cell.1 >= 0 && cell.1 < self.height
    }

    fn occupied(&self, cell: (i32, i32)) -> bool {
        self.robots.iter().any(|r| r.position == cell)
    }
}

const MOVES: &[(&str, (i32, i32))] = &[
    ("move north", (0, -1)),
    ("move south", (0, 1)),
    ("move west", (-1, 0)),
    ("move east", (1, 0)),
];
