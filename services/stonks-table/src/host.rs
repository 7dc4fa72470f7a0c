//! Lobby host and its line-oriented driver.
//!
//! The host owns the lobby roster and a [`ModeTable`]; the stonks engine is just one
//! registered mode. Inbound lines are applied with the current clock reading, engine timers
//! are fired when their deadline passes, and everything produced is written back as JSON
//! lines in order.

use std::time::Duration;

use anyhow::Context;
use stonks_execution::{Dispatch, ModeTable, RoundController};
use stonks_types::{
    ActionOutcome, OutboundEvent, Participant, ParticipantId, StonksConfig, GAME_MODE,
    MAX_NAME_LENGTH,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::wire::{engine_error_response, error_response, InboundMessage, OutboundLine};

pub struct Host {
    lobby: Vec<Participant>,
    modes: ModeTable,
    active_mode: Option<String>,
    outbox: Vec<OutboundLine>,
}

impl Host {
    pub fn new(config: StonksConfig) -> anyhow::Result<Self> {
        let controller = RoundController::new(config).context("invalid stonks config")?;
        let mut modes = ModeTable::new();
        modes.register(GAME_MODE, Box::new(controller));
        Ok(Self {
            lobby: Vec::new(),
            modes,
            active_mode: None,
            outbox: Vec::new(),
        })
    }

    pub fn lobby(&self) -> &[Participant] {
        &self.lobby
    }

    pub fn active_mode(&self) -> Option<&str> {
        self.active_mode.as_deref()
    }

    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.modes.next_deadline_ms()
    }

    pub fn handle_line(&mut self, line: &str, now_ms: u64) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        match serde_json::from_str::<InboundMessage>(line) {
            Ok(message) => self.handle(message, now_ms),
            Err(err) => warn!(%err, line, "skipping invalid inbound line"),
        }
    }

    pub fn handle(&mut self, message: InboundMessage, now_ms: u64) {
        match message {
            InboundMessage::Join { player_id, name } => self.join(player_id, name),
            InboundMessage::Leave { player_id } => self.leave(&player_id),
            InboundMessage::Start { mode } => self.start(mode, now_ms),
            InboundMessage::Action { player_id, action } => {
                let Some(mode) = self.active_mode.as_deref() else {
                    debug!(participant = %player_id, action = action.as_str(), "no active game");
                    return;
                };
                match self.modes.submit_action(mode, &player_id, action, now_ms) {
                    Dispatch::Handled(ActionOutcome::Applied) => {}
                    Dispatch::Handled(ActionOutcome::Discarded(reason)) => {
                        debug!(participant = %player_id, reason = reason.as_str(), "action discarded")
                    }
                    Dispatch::Unhandled => warn!(mode, "active mode has no engine"),
                }
                self.collect();
            }
        }
    }

    /// Fire every engine timer due at or before `now_ms`.
    pub fn tick(&mut self, now_ms: u64) {
        self.modes.tick(now_ms);
        self.collect();
    }

    pub fn drain(&mut self) -> Vec<OutboundLine> {
        std::mem::take(&mut self.outbox)
    }

    fn join(&mut self, id: ParticipantId, name: String) {
        let name = name.trim();
        if name.is_empty() || name.len() > MAX_NAME_LENGTH {
            self.outbox.push(error_response(
                "INVALID_NAME",
                format!("player name must be 1..={MAX_NAME_LENGTH} bytes"),
            ));
            return;
        }
        match self.lobby.iter_mut().find(|p| p.id == id) {
            Some(existing) => existing.name = name.to_string(),
            None => {
                info!(participant = %id, name, "player joined");
                self.lobby.push(Participant::new(id, name));
            }
        }
    }

    fn leave(&mut self, id: &ParticipantId) {
        let before = self.lobby.len();
        self.lobby.retain(|p| p.id != *id);
        if self.lobby.len() < before {
            info!(participant = %id, "player left");
        }
    }

    fn start(&mut self, mode: String, now_ms: u64) {
        if let Some(active) = &self.active_mode {
            self.outbox.push(error_response(
                "SESSION_IN_PROGRESS",
                format!("{active} session already running"),
            ));
            return;
        }
        match self.modes.start_session(&mode, self.lobby.clone(), now_ms) {
            Dispatch::Handled(Ok(())) => {
                info!(mode = %mode, players = self.lobby.len(), "game started");
                self.active_mode = Some(mode);
            }
            Dispatch::Handled(Err(err)) => {
                warn!(mode = %mode, %err, "game failed to start");
                self.outbox.push(engine_error_response(&err));
            }
            Dispatch::Unhandled => {
                warn!(mode = %mode, "unknown game mode");
                self.outbox
                    .push(error_response("UNKNOWN_MODE", format!("unknown game mode: {mode}")));
            }
        }
        self.collect();
    }

    fn collect(&mut self) {
        for (mode, event) in self.modes.drain_events() {
            if event == OutboundEvent::Reset && self.active_mode.as_deref() == Some(mode.as_str())
            {
                self.active_mode = None;
            }
            self.outbox.push(OutboundLine::Event(event));
        }
    }
}

fn elapsed_ms(clock: Instant) -> u64 {
    u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX)
}

async fn sleep_until_deadline(clock: Instant, deadline_ms: Option<u64>) {
    match deadline_ms {
        Some(ms) => time::sleep_until(clock + Duration::from_millis(ms)).await,
        None => std::future::pending().await,
    }
}

async fn write_lines<W>(output: &mut W, lines: Vec<OutboundLine>) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    if lines.is_empty() {
        return Ok(());
    }
    for line in lines {
        let mut payload = serde_json::to_vec(&line).context("failed to encode outbound line")?;
        payload.push(b'\n');
        output
            .write_all(&payload)
            .await
            .context("failed to write outbound line")?;
    }
    output.flush().await.context("failed to flush output")
}

/// Drive `host` from `input` until it closes and no timers remain.
pub async fn run<R, W>(host: &mut Host, input: R, mut output: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let clock = Instant::now();
    let mut lines = input.lines();
    let mut input_open = true;

    loop {
        let deadline_ms = host.next_deadline_ms();
        if !input_open && deadline_ms.is_none() {
            break;
        }
        tokio::select! {
            line = lines.next_line(), if input_open => {
                match line.context("failed to read inbound line")? {
                    Some(line) => host.handle_line(&line, elapsed_ms(clock)),
                    None => {
                        info!("input closed");
                        input_open = false;
                    }
                }
            }
            _ = sleep_until_deadline(clock, deadline_ms) => {
                let now_ms = elapsed_ms(clock).max(deadline_ms.unwrap_or_default());
                host.tick(now_ms);
            }
        }
        write_lines(&mut output, host.drain()).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stonks_execution::mocks::create_config;
    use stonks_types::ActionKind;

    fn host() -> Host {
        Host::new(create_config(1)).unwrap()
    }

    fn join(host: &mut Host, count: usize) {
        for i in 0..count {
            host.handle_line(
                &format!(r#"{{"type":"join","playerId":"p{i}","name":"Player {i}"}}"#),
                0,
            );
        }
    }

    fn kinds(lines: &[OutboundLine]) -> Vec<&'static str> {
        lines
            .iter()
            .map(|line| match line {
                OutboundLine::Event(event) => event.kind(),
                OutboundLine::Response(_) => "error",
            })
            .collect()
    }

    #[test]
    fn lobby_tracks_joins_and_leaves() {
        let mut host = host();
        join(&mut host, 3);
        host.handle_line(r#"{"type":"join","playerId":"p1","name":"Renamed"}"#, 0);
        host.handle_line(r#"{"type":"leave","playerId":"p0"}"#, 0);

        let names: Vec<_> = host.lobby().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Renamed", "Player 2"]);
        assert!(host.drain().is_empty());
    }

    #[test]
    fn rejects_long_names() {
        let mut host = host();
        let name = "x".repeat(MAX_NAME_LENGTH + 1);
        host.handle_line(
            &format!(r#"{{"type":"join","playerId":"p0","name":"{name}"}}"#),
            0,
        );
        assert!(host.lobby().is_empty());
        assert_eq!(kinds(&host.drain()), vec!["error"]);
    }

    #[test]
    fn invalid_lines_are_skipped() {
        let mut host = host();
        host.handle_line("not json", 0);
        host.handle_line(r#"{"type":"dance"}"#, 0);
        host.handle_line("   ", 0);
        assert!(host.drain().is_empty());
    }

    #[test]
    fn start_needs_three_players() {
        let mut host = host();
        join(&mut host, 2);
        host.handle_line(r#"{"type":"start","mode":"stonks"}"#, 0);
        assert_eq!(host.active_mode(), None);
        assert_eq!(
            host.drain(),
            vec![engine_error_response(&stonks_types::Error::InsufficientParticipants {
                count: 2,
                required: 3
            })]
        );
    }

    #[test]
    fn unknown_mode_is_reported() {
        let mut host = host();
        join(&mut host, 3);
        host.handle_line(r#"{"type":"start","mode":"trivia"}"#, 0);
        assert_eq!(host.active_mode(), None);
        assert_eq!(kinds(&host.drain()), vec!["error"]);
    }

    #[test]
    fn plays_one_round_to_reset() {
        let mut host = host();
        join(&mut host, 3);
        host.handle_line(r#"{"type":"start","mode":"stonks"}"#, 0);
        assert_eq!(host.active_mode(), Some(GAME_MODE));
        assert_eq!(host.next_deadline_ms(), Some(1_000));

        host.handle_line(r#"{"type":"start","mode":"stonks"}"#, 10);
        host.tick(1_000);
        host.handle(
            InboundMessage::Action {
                player_id: "p1".into(),
                action: ActionKind::Realize,
            },
            1_050,
        );
        // Resolution (2s), results (3s), game over (5s).
        host.tick(3_050);
        host.tick(6_050);
        host.tick(11_050);

        assert_eq!(
            kinds(&host.drain()),
            vec![
                "session_started",
                "round_prep",
                "error",
                "go",
                "resolution",
                "round_results",
                "game_over",
                "reset",
            ]
        );
        assert_eq!(host.active_mode(), None);
        assert_eq!(host.next_deadline_ms(), None);
    }

    #[test]
    fn actions_without_game_are_ignored() {
        let mut host = host();
        join(&mut host, 3);
        host.handle_line(r#"{"type":"action","playerId":"p0","action":"RAISE"}"#, 0);
        assert!(host.drain().is_empty());
    }

    #[tokio::test]
    async fn run_exits_when_input_closes_idle() {
        let mut host = host();
        let input = concat!(
            r#"{"type":"join","playerId":"p0","name":"Ada"}"#,
            "\n",
            r#"{"type":"join","playerId":"p1","name":"Bob"}"#,
            "\n",
            r#"{"type":"start","mode":"stonks"}"#,
            "\n",
        );
        let mut output = Vec::new();
        run(&mut host, input.as_bytes(), &mut output).await.unwrap();

        let written = String::from_utf8(output).unwrap();
        let lines: Vec<serde_json::Value> = written
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["type"], "error");
        assert_eq!(lines[0]["code"], "INSUFFICIENT_PARTICIPANTS");
    }

    #[tokio::test]
    async fn run_drives_timers_until_reset() {
        let config = StonksConfig {
            tick_ms: 5,
            prep_ms: 20,
            resolution_display_ms: 10,
            results_display_ms: 10,
            game_over_ms: 10,
            ..create_config(1)
        };
        let mut host = Host::new(config).unwrap();
        let (mut client, server) = tokio::io::duplex(4_096);

        let players = async move {
            for i in 0..3 {
                let line = format!(
                    "{{\"type\":\"join\",\"playerId\":\"p{i}\",\"name\":\"Player {i}\"}}\n"
                );
                client.write_all(line.as_bytes()).await.unwrap();
            }
            client
                .write_all(b"{\"type\":\"start\",\"mode\":\"stonks\"}\n")
                .await
                .unwrap();
            time::sleep(Duration::from_millis(60)).await;
            client
                .write_all(b"{\"type\":\"action\",\"playerId\":\"p1\",\"action\":\"REALIZE\"}\n")
                .await
                .unwrap();
            // Dropping the client closes input while the game is still running.
        };

        let mut output = Vec::new();
        let driver = run(&mut host, tokio::io::BufReader::new(server), &mut output);
        let (result, ()) = time::timeout(Duration::from_secs(5), async {
            tokio::join!(driver, players)
        })
        .await
        .unwrap();
        result.unwrap();

        let written = String::from_utf8(output).unwrap();
        let kinds: Vec<String> = written
            .lines()
            .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap())
            .map(|value| value["type"].as_str().unwrap().to_string())
            .filter(|kind| kind != "tick")
            .collect();
        assert_eq!(
            kinds,
            vec![
                "session_started",
                "round_prep",
                "go",
                "resolution",
                "round_results",
                "game_over",
                "reset",
            ]
        );
        assert_eq!(host.active_mode(), None);
        assert_eq!(host.next_deadline_ms(), None);
    }
}
