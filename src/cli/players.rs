use crate::game::action::GameAction;
use crate::game::game::Game;
use crate::players::{BaseSeat, RandomSeat, SuspicionSeat};

pub struct CliSeat {
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const CLI_SEATS: &[CliSeat] = &[
    CliSeat {
        code: "R",
        name: "RandomSeat",
        description: "Chooses actions at random.",
    },
    CliSeat {
        code: "S",
        name: "SparingModerator",
        description: "Random moderator that never kills its own demon while another target is left.",
    },
    CliSeat {
        code: "H",
        name: "SuspicionSeat",
        description: "Executes the token its living neighbours accuse most. First param is EPSILON.",
    },
];

#[derive(Debug, Clone)]
pub enum SeatInstance {
    Random(RandomSeat),
    Suspicion(SuspicionSeat),
}

impl BaseSeat for SeatInstance {
    fn decide(&self, game: &Game, actions: &[GameAction]) -> Option<GameAction> {
        match self {
            SeatInstance::Random(seat) => seat.decide(game, actions),
            SeatInstance::Suspicion(seat) => seat.decide(game, actions),
        }
    }
}

/// Parses a seat spec such as `R`, `S` or `H:0.1`.
pub fn create_seat(spec: &str, seed: u64) -> Option<SeatInstance> {
    let mut parts = spec.split(':');
    let code = parts.next()?.trim().to_uppercase();
    let params: Vec<&str> = parts.collect();
    match code.as_str() {
        "R" => Some(SeatInstance::Random(RandomSeat::seeded(seed))),
        "S" => Some(SeatInstance::Random(RandomSeat::seeded(seed).sparing_demon())),
        "H" => {
            let epsilon = params.first().and_then(|s| s.parse::<f64>().ok());
            Some(SeatInstance::Suspicion(SuspicionSeat::new(seed, epsilon)))
        }
        _ => None,
    }
}

pub fn print_seat_help() {
    println!("Seat Legend:");
    println!("{:<5} {:<20} DESCRIPTION", "CODE", "SEAT");
    println!("{}", "-".repeat(80));
    for seat in CLI_SEATS {
        println!("{:<5} {:<20} {}", seat.code, seat.name, seat.description);
    }
}
