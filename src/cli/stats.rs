use std::time::Duration;

use crate::game::game::Game;
use crate::types::Verdict;

#[derive(Debug, Default, Clone)]
pub struct GameStats {
    pub games: u32,
    pub blue_wins: u32,
    pub red_wins: u32,
    pub undecided: u32,
    pub total_actions: u64,
    pub total_rounds: u64,
    pub total_survivors: u64,
    pub total_duration: Duration,
}

impl GameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_game(&mut self, game: &Game, duration: Duration) {
        self.games += 1;
        self.total_duration += duration;
        self.total_actions += game.state.action_log().len() as u64;
        self.total_rounds += u64::from(game.state.round());
        self.total_survivors += game.state.ring().living_count() as u64;

        match game.verdict() {
            Verdict::BlueWin => self.blue_wins += 1,
            Verdict::RedWin => self.red_wins += 1,
            Verdict::None => self.undecided += 1,
        }
    }

    pub fn merge(&mut self, other: &GameStats) {
        self.games += other.games;
        self.blue_wins += other.blue_wins;
        self.red_wins += other.red_wins;
        self.undecided += other.undecided;
        self.total_actions += other.total_actions;
        self.total_rounds += other.total_rounds;
        self.total_survivors += other.total_survivors;
        self.total_duration += other.total_duration;
    }

    fn per_game(&self, total: u64) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        total as f64 / self.games as f64
    }

    pub fn blue_win_rate(&self) -> f64 {
        self.per_game(u64::from(self.blue_wins))
    }

    pub fn red_win_rate(&self) -> f64 {
        self.per_game(u64::from(self.red_wins))
    }

    pub fn get_avg_actions(&self) -> f64 {
        self.per_game(self.total_actions)
    }

    pub fn get_avg_rounds(&self) -> f64 {
        self.per_game(self.total_rounds)
    }

    pub fn get_avg_survivors(&self) -> f64 {
        self.per_game(self.total_survivors)
    }

    pub fn get_avg_duration(&self) -> Duration {
        if self.games == 0 {
            return Duration::ZERO;
        }
        self.total_duration / self.games
    }
}

#[derive(Default)]
pub struct StatisticsAccumulator {
    pub stats: GameStats,
}

impl StatisticsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn after(&mut self, game: &Game, duration: Duration) {
        self.stats.record_game(game, duration);
    }
}
