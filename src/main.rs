use chrono::Utc;
use cultivator::build_info;
use cultivator::character::{validate_name, CharacterManager};
use cultivator::choices::ChoiceEncounter;
use cultivator::core::{
    cultivate_batch, BatchControl, BatchPrompt, CultivationFocus, CultivatorState,
    MAX_BATCH_SESSIONS,
};
use cultivator::effects::{cure_cost, cure_effect, meditate, EffectDuration, MeditationOutcome};
use cultivator::encounters::EncounterConfig;
use cultivator::locations::{all_locations, location_bonuses, newly_unlocked, travel, LocationId};
use cultivator::realm::{
    attempt_breakthrough, bonus_factors, breakthrough_success_rate, stage_exp_requirement,
    BreakthroughReport, ProgressionPhase,
};
use rand::rngs::ThreadRng;
use std::io::{self, Write};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// One line of player input, already parsed.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Help,
    List,
    New(String),
    Load(usize),
    Delete(usize),
    Status,
    Cultivate { sessions: u32, auto_breakthrough: bool },
    Focus(CultivationFocus),
    Breakthrough,
    Meditate,
    Cure(String),
    Locations,
    Travel(LocationId),
    History,
    Save,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let index = |rest: &str| -> Result<usize, String> {
        rest.parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| format!("'{rest}' is not a character number"))
    };

    match word.to_lowercase().as_str() {
        "help" | "?" => Ok(Command::Help),
        "list" | "ls" => Ok(Command::List),
        "new" if !rest.is_empty() => Ok(Command::New(rest.to_string())),
        "new" => Err("usage: new <name>".to_string()),
        "load" => index(rest).map(Command::Load),
        "delete" => index(rest).map(Command::Delete),
        "status" | "s" => Ok(Command::Status),
        "cultivate" | "c" => {
            let mut sessions = 1;
            let mut auto_breakthrough = false;
            for arg in rest.split_whitespace() {
                if arg.eq_ignore_ascii_case("auto") {
                    auto_breakthrough = true;
                } else {
                    sessions = arg
                        .parse::<u32>()
                        .ok()
                        .filter(|n| (1..=MAX_BATCH_SESSIONS).contains(n))
                        .ok_or_else(|| format!("sessions must be between 1 and {MAX_BATCH_SESSIONS}"))?;
                }
            }
            Ok(Command::Cultivate {
                sessions,
                auto_breakthrough,
            })
        }
        "focus" => CultivationFocus::all()
            .into_iter()
            .find(|focus| focus.name().eq_ignore_ascii_case(rest))
            .map(Command::Focus)
            .ok_or_else(|| "usage: focus <balanced|aggressive|foundation>".to_string()),
        "breakthrough" | "b" => Ok(Command::Breakthrough),
        "meditate" | "m" => Ok(Command::Meditate),
        "cure" if !rest.is_empty() => Ok(Command::Cure(rest.to_string())),
        "cure" => Err("usage: cure <effect name>".to_string()),
        "locations" | "where" => Ok(Command::Locations),
        "travel" | "t" if !rest.is_empty() => LocationId::from_name(rest)
            .map(Command::Travel)
            .ok_or_else(|| format!("no location called '{rest}', see 'locations'")),
        "travel" | "t" => Err("usage: travel <location>".to_string()),
        "history" | "h" => Ok(Command::History),
        "save" => Ok(Command::Save),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        "" => Err(String::new()),
        other => Err(format!("unknown command '{other}', type 'help'")),
    }
}

struct Shell {
    manager: CharacterManager,
    cultivator: Option<CultivatorState>,
    encounter_config: EncounterConfig,
    rng: ThreadRng,
}

impl Shell {
    fn new(manager: CharacterManager) -> Self {
        Self {
            manager,
            cultivator: None,
            encounter_config: EncounterConfig::default(),
            rng: rand::thread_rng(),
        }
    }

    /// Returns false when the shell should exit.
    fn handle(&mut self, command: Command) -> io::Result<bool> {
        match command {
            Command::Help => print_help(),
            Command::List => self.list()?,
            Command::New(name) => self.create(&name)?,
            Command::Load(n) => self.load(n)?,
            Command::Delete(n) => self.delete(n)?,
            Command::Save => self.save()?,
            Command::Quit => {
                self.save()?;
                return Ok(false);
            }
            other => match self.cultivator.as_mut() {
                Some(state) => play(state, other, &self.encounter_config, &mut self.rng),
                None => println!("No cultivator loaded. Use 'new <name>' or 'load <n>'."),
            },
        }
        Ok(true)
    }

    fn list(&self) -> io::Result<()> {
        let characters = self.manager.list_characters()?;
        if characters.is_empty() {
            println!("No cultivators yet. Use 'new <name>' to begin.");
        }
        for (i, info) in characters.iter().enumerate() {
            if info.is_corrupted {
                println!("  {}. {} ({})", i + 1, info.character_name, info.filename);
            } else {
                println!(
                    "  {}. {:<16} Stage {} {}",
                    i + 1,
                    info.character_name,
                    info.stage,
                    info.realm
                );
            }
        }
        Ok(())
    }

    fn create(&mut self, name: &str) -> io::Result<()> {
        if let Err(msg) = validate_name(name) {
            println!("{msg}");
            return Ok(());
        }
        let state = CultivatorState::new(name.trim().to_string(), Utc::now().timestamp());
        println!("{} begins the path as {}.", state.character_name, state.title());
        self.manager.save_character(&state)?;
        self.cultivator = Some(state);
        Ok(())
    }

    fn load(&mut self, n: usize) -> io::Result<()> {
        let characters = self.manager.list_characters()?;
        let Some(info) = characters.get(n - 1) else {
            println!("No character number {n}.");
            return Ok(());
        };
        match self.manager.load_character(&info.filename) {
            Ok(state) => {
                println!("Welcome back, {} ({}).", state.character_name, state.title());
                self.cultivator = Some(state);
            }
            Err(err) => println!("Could not load {}: {err}", info.filename),
        }
        Ok(())
    }

    fn delete(&mut self, n: usize) -> io::Result<()> {
        let characters = self.manager.list_characters()?;
        let Some(info) = characters.get(n - 1) else {
            println!("No character number {n}.");
            return Ok(());
        };
        self.manager.delete_character(&info.filename)?;
        if self
            .cultivator
            .as_ref()
            .is_some_and(|state| state.character_id == info.character_id)
        {
            self.cultivator = None;
        }
        println!("Deleted {}.", info.character_name);
        Ok(())
    }

    fn save(&mut self) -> io::Result<()> {
        if let Some(state) = self.cultivator.as_mut() {
            state.last_save_time = Utc::now().timestamp();
            let filename = self.manager.save_character(state)?;
            println!("Saved to {}", self.manager.save_dir().join(filename).display());
        }
        Ok(())
    }
}

fn play(
    state: &mut CultivatorState,
    command: Command,
    config: &EncounterConfig,
    rng: &mut ThreadRng,
) {
    match command {
        Command::Status => print_status(state),
        Command::Cultivate {
            sessions,
            auto_breakthrough,
        } => {
            let location = location_bonuses(state);
            let batch = cultivate_batch(state, sessions, &location, config, rng, |state, prompt| {
                let result = match prompt {
                    BatchPrompt::Choice(encounter) => return ask_choice(encounter),
                    BatchPrompt::Session(result) => result,
                };
                for event in &result.events {
                    println!("  {}", event.describe());
                }
                if auto_breakthrough && state.phase() == ProgressionPhase::ReadyForBreakthrough {
                    BatchControl::AttemptBreakthrough
                } else if result.breakthrough_ready {
                    BatchControl::Stop
                } else {
                    BatchControl::Continue
                }
            });
            for resolution in &batch.choices {
                println!("{} {}", resolution.encounter, resolution.message);
                let summary = resolution.summary();
                if !summary.is_empty() {
                    println!("  {summary}");
                }
            }
            println!(
                "{} session(s): +{} experience, {} encounter(s).",
                batch.sessions.len(),
                batch.total_exp(),
                batch.encounters()
            );
            for report in &batch.breakthroughs {
                print_breakthrough(report);
            }
            for refusal in &batch.refusals {
                println!("Refused: {refusal}");
            }
            if batch.stopped_early {
                println!("Cultivation paused early.");
            }
        }
        Command::Focus(focus) => {
            state.cultivation_focus = focus;
            println!("Focus set to {focus}: {}", focus.description());
        }
        Command::Breakthrough => match attempt_breakthrough(state, rng) {
            Ok(report) => print_breakthrough(&report),
            Err(refusal) => println!("Cannot attempt breakthrough: {refusal}"),
        },
        Command::Meditate => match meditate(state, rng) {
            MeditationOutcome::Cleansed { removed } => {
                println!("Your mind clears. Removed: {}", removed.join(", "));
            }
            MeditationOutcome::Unsettled { success_rate } => {
                println!(
                    "Your thoughts refuse to settle ({:.0}% chance).",
                    success_rate * 100.0
                );
            }
            MeditationOutcome::NothingToCure {
                foundation_gained,
                comprehension_gained,
            } => println!(
                "A calm session. Foundation +{foundation_gained}, balance +{comprehension_gained}."
            ),
        },
        Command::Cure(name) => match cure_effect(state, &name) {
            Ok(receipt) => {
                print!("Cured {} for {}.", receipt.name, receipt.cost);
                if !receipt.change.is_empty() {
                    print!(" Change: {}.", receipt.change);
                }
                println!();
            }
            Err(refusal) => match refusal.shortfall() {
                Some(missing) => println!("{refusal} ({missing} more needed)"),
                None => println!("{refusal}"),
            },
        },
        Command::Locations => {
            for location in all_locations() {
                let marker = if location.id == state.location { "*" } else { " " };
                if location.is_unlocked_for(state.realm) {
                    println!(
                        " {marker} {:<18} stones x{:.1}  risk {:.1}  {}",
                        location.name, location.stone_multiplier, location.encounter_risk, location.description
                    );
                } else {
                    println!("   {:<18} locked until {}", location.name, location.unlock_realm);
                }
            }
        }
        Command::Travel(to) => match travel(state, to) {
            Ok(location) => {
                println!("You settle in {}. {}", location.name, location.description);
                println!("  Features: {}", location.features.join(", "));
            }
            Err(refusal) => println!("{refusal}"),
        },
        Command::History => {
            if state.history.is_empty() {
                println!("No sessions recorded yet.");
            }
            for summary in &state.history {
                let encounter = summary
                    .encounter
                    .as_ref()
                    .map(|e| format!(" | {} ({} {})", e.name, e.rarity, e.category))
                    .unwrap_or_default();
                println!(
                    "  #{:<5} {:<10} exp {:>3} -> {:>4}  foundation {:+}{}",
                    summary.session,
                    summary.focus.name(),
                    summary.base_exp,
                    summary.final_exp,
                    summary.foundation_change,
                    encounter
                );
            }
        }
        other => warn!(?other, "command reached play without a handler"),
    }
}

/// Reads one line from stdin. `None` at end of input.
fn read_line() -> io::Result<Option<String>> {
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Maps an answer to a choice prompt onto a batch decision. `None` asks again.
fn parse_choice_answer(answer: &str, options: usize) -> Option<BatchControl> {
    let answer = answer.trim();
    if answer.is_empty() || answer.eq_ignore_ascii_case("skip") {
        return Some(BatchControl::Continue);
    }
    if answer.eq_ignore_ascii_case("stop") {
        return Some(BatchControl::Stop);
    }
    match answer.parse::<usize>().ok()? {
        0 => Some(BatchControl::Continue),
        n if n <= options => Some(BatchControl::Choose(n - 1)),
        _ => None,
    }
}

fn ask_choice(encounter: &ChoiceEncounter) -> BatchControl {
    println!();
    println!("*** {} ({}) ***", encounter.name, encounter.rarity);
    println!("{}", encounter.description);
    println!("{}", encounter.context);
    for (i, option) in encounter.options.iter().enumerate() {
        println!("  {}. {} [{} risk]", i + 1, option.description, option.risk);
    }
    loop {
        print!("Choose 1-{}, 0 to skip, 'stop' to end cultivation: ", encounter.options.len());
        if io::stdout().flush().is_err() {
            return BatchControl::Continue;
        }
        match read_line() {
            Ok(Some(line)) => match parse_choice_answer(&line, encounter.options.len()) {
                Some(control) => return control,
                None => println!("No such option."),
            },
            Ok(None) => return BatchControl::Continue,
            Err(err) => {
                warn!(%err, "could not read choice");
                return BatchControl::Continue;
            }
        }
    }
}

fn print_breakthrough(report: &BreakthroughReport) {
    match report {
        BreakthroughReport::Success {
            from,
            to,
            success_rate,
            foundation_bonus,
            cleared_effects,
            awakening,
        } => {
            println!(
                "BREAKTHROUGH! {from} -> {to} ({:.0}% chance). Foundation +{foundation_bonus}.",
                success_rate * 100.0
            );
            if !cleared_effects.is_empty() {
                println!("  Cleared: {}", cleared_effects.join(", "));
            }
            if let Some(event) = awakening {
                println!("  {}", event.describe());
            }
            for location in newly_unlocked(*from, *to) {
                println!("  New location open: {} ({})", location.name, location.unlock_description);
            }
        }
        BreakthroughReport::Failure {
            success_rate,
            foundation_damage,
            exp_lost,
            recovery_time,
        } => {
            println!(
                "Breakthrough failed ({:.0}% chance). Foundation -{foundation_damage}, lost {exp_lost} experience.",
                success_rate * 100.0
            );
            println!("  Qi Deviation sets in. Recover for {recovery_time} sessions.");
        }
    }
}

fn print_status(state: &CultivatorState) {
    println!("═══ {} ═══", state.character_name);
    println!("  {}", state.title());
    println!(
        "  Experience:   {}/{}",
        state.experience,
        stage_exp_requirement(state.realm, state.stage)
    );
    println!(
        "  Foundation:   {} (stability {})",
        state.foundation_quality, state.foundation_stability
    );
    println!("  Combat Power: {}", state.combat_power());
    println!("  Focus:        {}", state.cultivation_focus);
    println!("  Location:     {}", state.location);
    match state.phase() {
        ProgressionPhase::ReadyForBreakthrough => {
            let rate = breakthrough_success_rate(
                state.realm,
                state.foundation_quality,
                &bonus_factors(state),
            );
            println!("  Breakthrough: ready ({:.0}% chance)", rate * 100.0);
        }
        ProgressionPhase::Recovering(sessions) => {
            println!("  Breakthrough: recovering ({sessions} sessions)");
        }
        ProgressionPhase::AtCap => println!("  Breakthrough: pinnacle reached"),
        ProgressionPhase::Accumulating => {}
    }
    println!("  Spirit Stones: {}", state.spirit_stones);

    if let Some(primary) = &state.primary_element {
        let mut elements = format!("{primary} (primary)");
        for secondary in &state.secondary_elements {
            elements.push_str(&format!(", {secondary}"));
        }
        println!("  Elements:     {elements}");
    }

    let mut dao: Vec<_> = state.dao_comprehension.iter().filter(|(_, v)| **v > 0).collect();
    dao.sort_by(|a, b| b.1.cmp(a.1));
    if !dao.is_empty() {
        let top: Vec<String> = dao.iter().take(3).map(|(k, v)| format!("{k} {v}")).collect();
        println!("  Dao:          {}", top.join(", "));
    }

    for effect in &state.ongoing_effects {
        let remaining = match effect.remaining {
            EffectDuration::Sessions(n) => format!("{n} sessions"),
            EffectDuration::UntilCured => "until cured".to_string(),
        };
        let cure = cure_cost(&effect.name)
            .map(|cost| format!(", cure {cost}"))
            .unwrap_or_default();
        println!(
            "  Effect:       {} x{:.2} ({remaining}{cure})",
            effect.name, effect.exp_multiplier
        );
    }
}

fn print_help() {
    println!("Characters: list | new <name> | load <n> | delete <n> | save | quit");
    println!("Cultivation:");
    println!("  cultivate [N] [auto]  Run 1-{MAX_BATCH_SESSIONS} sessions, 'auto' attempts breakthroughs");
    println!("  focus <name>          balanced, aggressive or foundation");
    println!("  breakthrough          Attempt to reach the next realm");
    println!("  meditate              Try to purge negative effects");
    println!("  cure <effect>         Pay spirit stones to remove an effect");
    println!("  locations             List cultivation grounds");
    println!("  travel <location>     Move to an unlocked location");
    println!("  status | history");
}

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" | "-v" => {
                println!(
                    "cultivator {} ({})",
                    build_info::BUILD_DATE,
                    build_info::BUILD_COMMIT
                );
                return Ok(());
            }
            "--help" | "-h" => {
                println!("Cultivator - text-driven cultivation idle game\n");
                println!("Usage: cultivator [--version | --help]\n");
                print_help();
                return Ok(());
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Run 'cultivator --help' for usage.");
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let mut shell = Shell::new(CharacterManager::new()?);
    println!("Cultivator - type 'help' for commands.");
    shell.list()?;

    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = read_line()? else {
            shell.save()?;
            break;
        };
        match parse_command(&line) {
            Ok(command) => {
                if !shell.handle(command)? {
                    break;
                }
            }
            Err(msg) if msg.is_empty() => {}
            Err(msg) => println!("{msg}"),
        }
    }

    Ok(())
}
