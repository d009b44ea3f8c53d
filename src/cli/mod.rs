pub mod commands;
pub mod players;
pub mod render;
pub mod stats;

pub use commands::{Command, CommandError, HELP};
pub use players::{CLI_SEATS, CliSeat, SeatInstance, create_seat, print_seat_help};
pub use stats::{GameStats, StatisticsAccumulator};
