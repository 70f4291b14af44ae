//! Console command dispatch.
//!
//! A submitted line may hold several commands separated by `;`. Each is
//! trimmed, tokenized and dispatched on its first word (case-insensitive).
//! Mistakes are answered with console lines; only engine invariant
//! violations come back as errors.

use fieldops_actions::Actor;
use fieldops_types::{ActionKind, LogCategory, SkillName};

use super::shorthand::{resolve_action, resolve_kind};
use super::{help, tokenize};
use crate::automation::Threshold;
use crate::engine::Engine;
use crate::error::EngineError;

impl Engine {
    /// Run a console line.
    ///
    /// The line is echoed, recorded in history and split on `;`.
    ///
    /// # Errors
    ///
    /// Propagates [`Engine::start_action`] errors.
    pub fn execute_commands(&mut self, actor: &mut dyn Actor, line: &str) -> Result<(), EngineError> {
        self.console.post(format!("> {line}"));
        self.console.record_history(line);
        for command in line.split(';') {
            self.execute_command(actor, command)?;
        }
        Ok(())
    }

    fn execute_command(&mut self, actor: &mut dyn Actor, command: &str) -> Result<(), EngineError> {
        let collapsed = command.split_whitespace().collect::<Vec<_>>().join(" ");
        let args = tokenize(&collapsed);
        let Some(head) = args.first() else {
            return Ok(());
        };
        tracing::debug!(command = %collapsed, "Console command");

        match head.to_lowercase().as_str() {
            "automate" => self.console_automate(&args),
            "clear" | "cls" => self.console.clear(),
            "help" => self.console_help(&args),
            "log" => self.console_log(&args),
            "skill" => self.console_skill(&args),
            "start" => self.console_start(actor, &args)?,
            "stop" => self.reset_action(),
            _ => self.console.post("Invalid console command"),
        }
        Ok(())
    }

    fn console_start(&mut self, actor: &mut dyn Actor, args: &[String]) -> Result<(), EngineError> {
        let [_, kind, name] = args else {
            self.console
                .post("Invalid usage of 'start' console command: start [type] [name]");
            self.console.post("Use 'help start' for more info");
            return Ok(());
        };
        let Some(id) = resolve_action(kind, name) else {
            self.console.post(format!(
                "Invalid action type / name specified: type: {kind}, name: {name}"
            ));
            return Ok(());
        };
        let attempt = self.start_action(actor, Some(id))?;
        self.console.post(attempt.message());
        Ok(())
    }

    fn console_skill(&mut self, args: &[String]) {
        match args {
            [_, action] if action.eq_ignore_ascii_case("list") => self.post_skill_list(),
            [_, action, name] => {
                let Some(skill) = SkillName::from_name(name) else {
                    self.console.post(format!("Invalid skill name: {name}"));
                    return;
                };
                match action.to_lowercase().as_str() {
                    "list" => {
                        let level = self.skills.level(skill);
                        self.console.post(format!("{skill}: Level {level}"));
                    }
                    "level" => {
                        let attempt = self.upgrade_skill(skill, 1);
                        self.console.post(attempt.message());
                    }
                    _ => self.post_skill_usage(),
                }
            }
            _ => self.post_skill_usage(),
        }
    }

    fn post_skill_usage(&mut self) {
        self.console
            .post("Invalid usage of 'skill' console command: skill [action] [name]");
        self.console.post("Use 'help skill' for more info");
    }

    fn post_skill_list(&mut self) {
        self.console.post("Skills: ");
        for &skill in SkillName::ALL {
            let level = self.skills.level(skill);
            self.console.post(format!("{skill}: Level {level}"));
        }
        self.console.post(" ");
        self.console.post("Effects: ");
        let effects: Vec<String> = self
            .skill_mults
            .iter()
            .map(|(mult, value)| format!("{mult}: x{value:.3}"))
            .collect();
        for line in effects {
            self.console.post(line);
        }
    }

    fn console_log(&mut self, args: &[String]) {
        let (Some(flag), Some(category)) = (args.get(1), args.get(2)) else {
            self.console
                .post("Invalid usage of log command: log [enable/disable] [action/event]");
            self.console
                .post("Use 'help log' for more details and examples");
            return;
        };
        let enabled = !flag.to_lowercase().contains('d');
        let target = match category.to_lowercase().as_str() {
            "general" | "gen" => Some(LogCategory::General),
            "contract" | "contracts" => Some(LogCategory::Contracts),
            "ops" | "op" | "operations" | "operation" => Some(LogCategory::Operations),
            "blackops" | "blackop" | "black operations" | "black operation" => {
                Some(LogCategory::BlackOps)
            }
            "event" | "events" => Some(LogCategory::Events),
            "all" => None,
            _ => {
                self.console
                    .post(format!("Invalid action/event type specified: {category}"));
                self.console.post(
                    "Examples of valid action/event identifiers are: [general, contracts, ops, blackops, events]",
                );
                return;
            }
        };
        let what = match target {
            Some(category) => {
                self.logging.set(category, enabled);
                match category {
                    LogCategory::General => "general actions",
                    LogCategory::Contracts => "Contracts",
                    LogCategory::Operations => "Operations",
                    LogCategory::BlackOps => "BlackOps",
                    LogCategory::Events => "events",
                }
            }
            None => {
                self.logging.set_all(enabled);
                "everything"
            }
        };
        let state = if enabled { "enabled" } else { "disabled" };
        self.console.log(format!("Logging {state} for {what}"));
    }

    fn console_help(&mut self, args: &[String]) {
        let topics = args.get(1..).unwrap_or_default();
        if topics.is_empty() {
            for line in help::OVERVIEW {
                self.console.post(*line);
            }
            return;
        }
        for topic in topics {
            if let Some(lines) = help::topic(topic) {
                for line in lines {
                    self.console.post(*line);
                }
            }
        }
    }

    fn console_automate(&mut self, args: &[String]) {
        match args {
            [_, flag] => self.automate_toggle(flag),
            [_, var, value, which] => {
                let which = if which.to_lowercase().contains("hi") {
                    Threshold::High
                } else {
                    Threshold::Low
                };
                self.automate_set(var, value, which);
            }
            _ => self.console.post(
                "Invalid use of 'automate' command: automate [var] [val] [hi/low]. Use 'help automate' for more info",
            ),
        }
    }

    fn automate_toggle(&mut self, flag: &str) {
        let lowered = flag.to_lowercase();
        if lowered == "status" {
            let automation = self.automation;
            let state = if automation.enabled {
                "enabled"
            } else {
                "disabled"
            };
            let low = automation.low_action.map_or("Idle", |id| id.name());
            let high = automation.high_action.map_or("Idle", |id| id.name());
            self.console.post(format!("Automation: {state}"));
            self.console.post(format!(
                "When your stamina drops to {:.0}, you will automatically switch to {low}. When your stamina recovers to {:.0}, you will automatically switch to {high}.",
                automation.low_threshold, automation.high_threshold
            ));
        } else if lowered.contains("en") {
            if self.automation.is_configured() {
                self.automation.enabled = true;
                self.console.log("Automation enabled");
            } else {
                self.console
                    .log("Failed to enable automation. Actions were not set");
            }
        } else if lowered.contains('d') {
            self.automation.enabled = false;
            self.console.log("Automation disabled");
        } else {
            self.console.log(format!(
                "Invalid argument for 'automate' console command: {flag}"
            ));
        }
    }

    fn automate_set(&mut self, var: &str, value: &str, which: Threshold) {
        let label = which.label();
        if var.eq_ignore_ascii_case("stamina") {
            match value.parse::<f64>() {
                Ok(threshold) if threshold.is_finite() => {
                    self.automation.set_threshold(which, threshold);
                    self.console.log(format!(
                        "Automate ({label}) stamina threshold set to {threshold}"
                    ));
                }
                _ => self.console.post(format!(
                    "Invalid value specified for stamina threshold (must be numeric): {value}"
                )),
            }
            return;
        }

        if let Some(id) = resolve_action(var, value) {
            self.automation.set_action(which, id);
            self.console
                .log(format!("Automate ({label}) action set to {}", id.name()));
            return;
        }
        let line = match resolve_kind(var) {
            Some(ActionKind::General) => format!("Invalid General Action name specified: {value}"),
            Some(ActionKind::Contract) => format!("Invalid Contract name specified: {value}"),
            Some(ActionKind::Operation) => format!("Invalid Operation name specified: {value}"),
            Some(ActionKind::BlackOp) | None => "Invalid use of automate command.".to_owned(),
        };
        self.console.post(line);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fieldops_actions::BasicActor;
    use fieldops_types::{ActionId, ContractName, GeneralActionName};

    use crate::config::EngineConfig;
    use crate::engine::Engine;

    fn setup() -> (Engine, BasicActor) {
        let actor = BasicActor::new("Agent");
        let engine = Engine::new(&EngineConfig::default(), &actor).unwrap();
        (engine, actor)
    }

    fn run(engine: &mut Engine, actor: &mut BasicActor, line: &str) -> Vec<String> {
        let before = engine.console().len();
        engine.execute_commands(actor, line).unwrap();
        let lines: Vec<String> = engine.console().lines().map(str::to_owned).collect();
        lines.into_iter().skip(before).collect()
    }

    #[test]
    fn start_resolves_shorthand() {
        let (mut engine, mut actor) = setup();
        let out = run(&mut engine, &mut actor, r#"start contract "bounty hunter""#);
        assert_eq!(out.last().map(String::as_str), Some("Started action Bounty Hunter"));
        assert_eq!(
            engine.current_action(),
            Some(ActionId::Contract(ContractName::BountyHunter))
        );
    }

    #[test]
    fn start_with_wrong_arity_explains_usage() {
        let (mut engine, mut actor) = setup();
        let out = run(&mut engine, &mut actor, "start contract");
        assert_eq!(
            out.get(1).map(String::as_str),
            Some("Invalid usage of 'start' console command: start [type] [name]")
        );
        assert_eq!(engine.current_action(), None);
    }

    #[test]
    fn start_with_unknown_name() {
        let (mut engine, mut actor) = setup();
        let out = run(&mut engine, &mut actor, "start general napping");
        assert_eq!(
            out.last().map(String::as_str),
            Some("Invalid action type / name specified: type: general, name: napping")
        );
    }

    #[test]
    fn stop_goes_idle() {
        let (mut engine, mut actor) = setup();
        run(&mut engine, &mut actor, "start general training; stop");
        assert_eq!(engine.current_action(), None);
    }

    #[test]
    fn unknown_command() {
        let (mut engine, mut actor) = setup();
        let out = run(&mut engine, &mut actor, "dance");
        assert_eq!(out.last().map(String::as_str), Some("Invalid console command"));
    }

    #[test]
    fn empty_commands_are_ignored() {
        let (mut engine, mut actor) = setup();
        let out = run(&mut engine, &mut actor, " ; ;");
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn clear_empties_transcript() {
        let (mut engine, mut actor) = setup();
        run(&mut engine, &mut actor, "cls");
        assert!(engine.console().is_empty());
        assert_eq!(engine.console().history().last(), Some("cls"));
    }

    #[test]
    fn skill_list_shows_every_skill() {
        let (mut engine, mut actor) = setup();
        let out = run(&mut engine, &mut actor, "skill list");
        assert_eq!(out.get(1).map(String::as_str), Some("Skills: "));
        assert!(out.iter().any(|l| l == "Cloak: Level 0"));
        assert!(out.iter().any(|l| l == "Hyperdrive: Level 0"));
    }

    #[test]
    fn skill_level_without_points_is_refused() {
        let (mut engine, mut actor) = setup();
        let out = run(&mut engine, &mut actor, "skill level Cloak");
        assert!(out.last().unwrap().starts_with("Cannot upgrade Cloak: "));
    }

    #[test]
    fn skill_level_with_points() {
        let (mut engine, mut actor) = setup();
        engine.change_rank(&mut actor, 30.0).unwrap();
        let out = run(&mut engine, &mut actor, r#"skill level "blade's intuition""#);
        assert_eq!(
            out.last().map(String::as_str),
            Some("Upgraded skill Blade's Intuition by 1 level")
        );
        let out = run(&mut engine, &mut actor, r#"skill list "Blade's Intuition""#);
        assert_eq!(out.last().map(String::as_str), Some("Blade's Intuition: Level 1"));
    }

    #[test]
    fn skill_bad_usage() {
        let (mut engine, mut actor) = setup();
        let out = run(&mut engine, &mut actor, "skill");
        assert_eq!(
            out.get(1).map(String::as_str),
            Some("Invalid usage of 'skill' console command: skill [action] [name]")
        );
        let out = run(&mut engine, &mut actor, "skill level Juggling");
        assert_eq!(out.last().map(String::as_str), Some("Invalid skill name: Juggling"));
    }

    #[test]
    fn log_toggles_categories() {
        let (mut engine, mut actor) = setup();
        let out = run(&mut engine, &mut actor, "log disable events");
        assert!(!engine.log_toggles().events);
        assert!(out.last().unwrap().ends_with("Logging disabled for events"));

        run(&mut engine, &mut actor, "log dis all");
        assert!(!engine.log_toggles().general);
        run(&mut engine, &mut actor, "log en ops");
        assert!(engine.log_toggles().ops);
        assert!(!engine.log_toggles().contracts);
    }

    #[test]
    fn log_rejects_unknown_category() {
        let (mut engine, mut actor) = setup();
        let out = run(&mut engine, &mut actor, "log en weather");
        assert_eq!(
            out.get(1).map(String::as_str),
            Some("Invalid action/event type specified: weather")
        );
    }

    #[test]
    fn help_lists_commands_and_topics() {
        let (mut engine, mut actor) = setup();
        let out = run(&mut engine, &mut actor, "help");
        assert!(out.iter().any(|l| l.contains("start [type] [name]")));
        let out = run(&mut engine, &mut actor, "help stop log");
        assert_eq!(out.get(1).map(String::as_str), Some("stop"));
        assert!(out.iter().any(|l| l == "log [en/dis] [type]"));
    }

    #[test]
    fn automate_requires_both_actions() {
        let (mut engine, mut actor) = setup();
        let out = run(&mut engine, &mut actor, "automate en");
        assert!(out.last().unwrap().ends_with("Failed to enable automation. Actions were not set"));
        assert!(!engine.automation().enabled);

        run(&mut engine, &mut actor, "automate general training low");
        run(&mut engine, &mut actor, r#"automate contract "Bounty Hunter" hi"#);
        run(&mut engine, &mut actor, "automate stamina 5 low; automate stamina 20 hi");
        let out = run(&mut engine, &mut actor, "automate enable");
        assert!(out.last().unwrap().ends_with("Automation enabled"));

        let automation = engine.automation();
        assert!(automation.enabled);
        assert_eq!(
            automation.low_action,
            Some(ActionId::General(GeneralActionName::Training))
        );
        assert_eq!(
            automation.high_action,
            Some(ActionId::Contract(ContractName::BountyHunter))
        );
        assert!((automation.low_threshold - 5.0).abs() < f64::EPSILON);
        assert!((automation.high_threshold - 20.0).abs() < f64::EPSILON);

        let out = run(&mut engine, &mut actor, "automate status");
        assert_eq!(out.get(1).map(String::as_str), Some("Automation: enabled"));
        assert_eq!(
            out.get(2).map(String::as_str),
            Some(
                "When your stamina drops to 5, you will automatically switch to Training. When your stamina recovers to 20, you will automatically switch to Bounty Hunter."
            )
        );

        run(&mut engine, &mut actor, "automate disable");
        assert!(!engine.automation().enabled);
    }

    #[test]
    fn automate_reports_bad_values() {
        let (mut engine, mut actor) = setup();
        let out = run(&mut engine, &mut actor, "automate stamina lots hi");
        assert_eq!(
            out.last().map(String::as_str),
            Some("Invalid value specified for stamina threshold (must be numeric): lots")
        );
        let out = run(&mut engine, &mut actor, "automate contract Nope hi");
        assert_eq!(
            out.last().map(String::as_str),
            Some("Invalid Contract name specified: Nope")
        );
        let out = run(&mut engine, &mut actor, "automate weather Nope hi");
        assert_eq!(
            out.last().map(String::as_str),
            Some("Invalid use of automate command.")
        );
        let out = run(&mut engine, &mut actor, "automate");
        assert!(out.last().unwrap().starts_with("Invalid use of 'automate' command"));
    }
}
