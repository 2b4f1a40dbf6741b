//! Developer console commands for player progression.
//!
//! | Command        | Effect                                         |
//! |----------------|------------------------------------------------|
//! | `stats`        | Print level, experience, and tokens            |
//! | `addexp <n>`   | Grant `n` experience, then print the new state |
//! | `printlevels`  | Print the experience cost of levels 1–99       |
//! | `help`         | List registered commands                       |
//!
//! Commands never reach for global state: everything they touch comes in
//! through a [`CommandContext`].

use std::collections::BTreeMap;
use std::str::FromStr;

use turntable_core::{LevelCurve, Profile};

use crate::engine::{Console, EventBus, Rgba};
use crate::error::CommandError;
use crate::session::grant_experience;

/// State a command runs against.
pub struct CommandContext<'a> {
    pub profile: &'a mut Profile,
    pub curve: &'a LevelCurve,
    /// Highest level `printlevels` lists.
    pub level_table_max: u32,
    pub console: &'a mut dyn Console,
    pub events: &'a mut dyn EventBus,
}

/// Whitespace-separated arguments following the command name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    args: Vec<String>,
}

impl CommandArgs {
    /// Split a full command line into its name and arguments.
    ///
    /// Returns `None` for a blank line.
    #[must_use]
    pub fn parse(line: &str) -> Option<(String, Self)> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next()?.to_ascii_lowercase();
        let args = tokens.map(str::to_string).collect();
        Some((name, Self { args }))
    }

    /// Whether at least `count` arguments were given.
    #[must_use]
    pub fn has_args(&self, count: usize) -> bool {
        self.args.len() >= count
    }

    /// Argument `index` parsed as an integer of type `T`.
    ///
    /// # Errors
    /// [`CommandError::MissingArgument`], or [`CommandError::NotAnInteger`]
    /// when the text is not an integer that fits `T`.
    pub fn int_argument<T: FromStr>(&self, index: usize) -> Result<T, CommandError> {
        let raw = self
            .args
            .get(index)
            .ok_or(CommandError::MissingArgument { index })?;
        raw.parse().map_err(|_| CommandError::NotAnInteger {
            value: raw.clone(),
        })
    }
}

/// Signature every console command implements.
pub type CommandHandler = fn(&mut CommandContext<'_>, &CommandArgs);

#[derive(Debug, Clone, Copy)]
struct RegisteredCommand {
    handler: CommandHandler,
    usage: &'static str,
}

/// Name → handler table.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, RegisteredCommand>,
}

impl CommandRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding `stats`, `addexp`, `printlevels`, and `help`.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("stats", "stats", stats);
        registry.register(
            "addexp",
            "addexp <number of experience points to add>",
            add_exp,
        );
        registry.register("printlevels", "printlevels", print_levels);
        registry
    }

    /// Add or replace a command.
    pub fn register(&mut self, name: &str, usage: &'static str, handler: CommandHandler) {
        self.commands
            .insert(name.to_ascii_lowercase(), RegisteredCommand { handler, usage });
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Run one console line. Returns `false` if the command is unknown.
    pub fn execute(&self, line: &str, ctx: &mut CommandContext<'_>) -> bool {
        let Some((name, args)) = CommandArgs::parse(line) else {
            return true;
        };

        if name == "help" {
            for command in self.commands.values() {
                ctx.console.print_line(command.usage, Rgba::WHITE);
            }
            return true;
        }

        match self.commands.get(&name) {
            Some(command) => {
                tracing::debug!(command = %name, "Console command");
                (command.handler)(ctx, &args);
                true
            }
            None => {
                ctx.console
                    .print_line(&format!("Unknown command: {name}"), Rgba::RED);
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Built-in commands
// ---------------------------------------------------------------------------

fn stats(ctx: &mut CommandContext<'_>, _args: &CommandArgs) {
    let profile = *ctx.profile;
    ctx.console
        .print_line(&format!("You are level {}.", profile.level), Rgba::CYAN);
    ctx.console.print_line(
        &format!("You have {} experience.", profile.experience),
        Rgba::CERULEAN,
    );
    ctx.console.print_line(
        &format!("You have {} tokens available to spend.", profile.tokens),
        Rgba::BADDAD,
    );
}

fn add_exp(ctx: &mut CommandContext<'_>, args: &CommandArgs) {
    let amount: u64 = match args.int_argument(0) {
        Ok(amount) => amount,
        Err(_) => {
            ctx.console
                .print_line("addexp <number of experience points to add>", Rgba::RED);
            return;
        }
    };

    grant_experience(ctx.profile, amount, ctx.curve, ctx.events);

    let profile = *ctx.profile;
    ctx.console
        .print_line(&format!("You are now level {}.", profile.level), Rgba::CYAN);
    ctx.console.print_line(
        &format!("You now have {} experience.", profile.experience),
        Rgba::CERULEAN,
    );
    ctx.console.print_line(
        &format!("You now have {} tokens available to spend.", profile.tokens),
        Rgba::BADDAD,
    );
}

fn print_levels(ctx: &mut CommandContext<'_>, _args: &CommandArgs) {
    for (level, required) in ctx.curve.level_table(ctx.level_table_max) {
        ctx.console.print_line(
            &format!("Level {level} takes {required} exp."),
            Rgba::BADDAD,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ConsoleLog, EventLog};

    struct Harness {
        profile: Profile,
        curve: LevelCurve,
        console: ConsoleLog,
        events: EventLog,
        registry: CommandRegistry,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                profile: Profile::new(),
                curve: LevelCurve::default(),
                console: ConsoleLog::new(),
                events: EventLog::new(),
                registry: CommandRegistry::with_builtins(),
            }
        }

        fn run(&mut self, line: &str) -> bool {
            let mut ctx = CommandContext {
                profile: &mut self.profile,
                curve: &self.curve,
                level_table_max: 99,
                console: &mut self.console,
                events: &mut self.events,
            };
            self.registry.execute(line, &mut ctx)
        }
    }

    #[test]
    fn parse_splits_name_and_args() {
        let (name, args) = CommandArgs::parse("  AddExp   250 extra ").expect("line");
        assert_eq!(name, "addexp");
        assert!(args.has_args(2));
        assert!(!args.has_args(3));
        assert_eq!(args.int_argument::<i64>(0), Ok(250));
        assert_eq!(
            args.int_argument::<i64>(1),
            Err(CommandError::NotAnInteger {
                value: "extra".to_string()
            })
        );
        assert_eq!(
            args.int_argument::<i64>(2),
            Err(CommandError::MissingArgument { index: 2 })
        );
        assert!(CommandArgs::parse("   ").is_none());
    }

    #[test]
    fn stats_prints_three_lines() {
        let mut h = Harness::new();
        assert!(h.run("stats"));
        assert_eq!(
            h.console.text(),
            [
                "You are level 1.",
                "You have 0 experience.",
                "You have 0 tokens available to spend.",
            ]
        );
        assert_eq!(h.console.lines[0].1, Rgba::CYAN);
    }

    #[test]
    fn addexp_grants_and_reports() {
        let mut h = Harness::new();
        assert!(h.run("addexp 950"));
        assert_eq!(h.profile, Profile::from_parts(950, 4, 3));
        assert_eq!(h.events.count("LevelUp"), 1);
        assert_eq!(
            h.console.text(),
            [
                "You are now level 4.",
                "You now have 950 experience.",
                "You now have 3 tokens available to spend.",
            ]
        );
    }

    #[test]
    fn addexp_without_argument_prints_usage_only() {
        let mut h = Harness::new();
        h.run("addexp");
        assert_eq!(h.profile, Profile::new());
        assert!(h.events.events.is_empty());
        assert_eq!(
            h.console.lines,
            [(
                "addexp <number of experience points to add>".to_string(),
                Rgba::RED
            )]
        );
    }

    #[test]
    fn addexp_rejects_bad_amounts() {
        for line in ["addexp ten", "addexp -50", "addexp 1.5"] {
            let mut h = Harness::new();
            h.run(line);
            assert_eq!(h.profile, Profile::new(), "{line} changed the profile");
            assert_eq!(h.console.lines.len(), 1);
            assert_eq!(h.console.lines[0].1, Rgba::RED);
        }
    }

    #[test]
    fn addexp_accepts_amounts_past_i64() {
        let mut h = Harness::new();
        let amount = u64::MAX - 5;
        assert!(h.run(&format!("addexp {amount}")));
        assert_eq!(h.profile.experience, amount);
        assert_eq!(h.console.lines[0].1, Rgba::CYAN);
        assert_eq!(h.events.count("LevelUp"), 1);
    }

    #[test]
    fn printlevels_lists_99_levels() {
        let mut h = Harness::new();
        h.run("printlevels");
        let text = h.console.text();
        assert_eq!(text.len(), 99);
        assert_eq!(text[0], "Level 1 takes 0 exp.");
        assert_eq!(text[1], "Level 2 takes 100 exp.");
        assert_eq!(text[98], "Level 99 takes 960400 exp.");
    }

    #[test]
    fn unknown_command_reports_error() {
        let mut h = Harness::new();
        assert!(!h.run("spin"));
        assert_eq!(h.console.text(), ["Unknown command: spin"]);
    }

    #[test]
    fn help_lists_usage() {
        let mut h = Harness::new();
        h.run("help");
        let text = h.console.text();
        assert!(text.contains(&"addexp <number of experience points to add>"));
        assert_eq!(text.len(), 3);
        assert_eq!(
            h.registry.names().collect::<Vec<_>>(),
            ["addexp", "printlevels", "stats"]
        );
    }
}
