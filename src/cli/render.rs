use itertools::Itertools;

use crate::game::GameEvent;
use crate::snapshot::{Observation, TokenSnapshot, VisibleAlignment};
use crate::types::{Character, DeathCause, Phase};

fn render_token(token: &TokenSnapshot) -> String {
    let status = if token.alive { "alive" } else { "dead" };
    let alignment = match token.alignment {
        VisibleAlignment::Unknown => "?".to_string(),
        known => known.to_string(),
    };
    let character = token
        .character
        .map_or_else(|| "?".to_string(), |c: Character| c.to_string());
    let drunk = match token.intoxicated {
        Some(true) => " (drunk)",
        _ => "",
    };
    format!(
        "#{:<3} {:<5} {:<5} {:<10} shows {}{}",
        token.id, status, alignment, character, token.displayed_count, drunk
    )
}

/// One row per token, in seating order.
pub fn render_ring(tokens: &[TokenSnapshot]) -> String {
    tokens.iter().map(render_token).join("\n")
}

/// Compact one-line view: `1:0 2:1 [3] 4:2`, dead tokens bracketed.
pub fn render_ring_line(tokens: &[TokenSnapshot]) -> String {
    tokens
        .iter()
        .map(|token| match token.alive {
            true => format!("{}:{}", token.id, token.displayed_count),
            false => format!("[{}]", token.id),
        })
        .join(" ")
}

pub fn render_observation(observation: &Observation) -> String {
    let mut header = format!(
        "{} | round {} | {} alive",
        observation.phase,
        observation.round,
        observation.tokens.iter().filter(|t| t.alive).count()
    );
    if observation.phase == Phase::GameOver {
        header.push_str(&format!(" | {}", observation.verdict));
    }
    if let Some(id) = observation.pending_red {
        header.push_str(&format!(" | waiting on red #{id}"));
    }
    format!("{header}\n{}", render_ring(&observation.tokens))
}

/// Pretty JSON for a viewer's observation, for piping into other tools.
pub fn render_json(observation: &Observation) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(observation)
}

pub fn render_event(event: &GameEvent) -> String {
    match event {
        GameEvent::SetupStarted {
            session,
            seed,
            tokens_count,
            red_count,
        } => format!("session {session} (seed {seed}): {tokens_count} tokens, {red_count} red"),
        GameEvent::RedSelected { token } => format!("#{token} is red"),
        GameEvent::DemonSelected { token } => format!("#{token} is the demon"),
        GameEvent::DisinformationSet { token, value } => format!("#{token} will show {value}"),
        GameEvent::ReentrySkipped => "red information kept".to_string(),
        GameEvent::IntoxicationChanged { token, intoxicated } => match intoxicated {
            true => format!("#{token} is drunk"),
            false => format!("#{token} is sober"),
        },
        GameEvent::TokenRemoved { token, cause } => match cause {
            DeathCause::Execution => format!("#{token} was executed"),
            DeathCause::Kill => format!("#{token} was killed"),
        },
        GameEvent::GameOver { verdict } => format!("game over: {verdict}"),
    }
}

pub fn render_events(events: &[GameEvent]) -> String {
    events
        .iter()
        .enumerate()
        .map(|(i, event)| format!("{:>3}. {}", i + 1, render_event(event)))
        .join("\n")
}
