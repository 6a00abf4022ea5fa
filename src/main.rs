use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::process;

use rand::rngs::StdRng;
use rand::SeedableRng;

use chordsmith::quiz::{Progress, QuizKind, Session, Submission};
use chordsmith::{
    compose_chord, format_progression, progression_from_str, DifficultyTable, Level, Note,
    OctaveShift, ProgressionPlayer, Quality, PRESETS,
};

const USAGE: &str = "Usage: chordsmith chord <root> <quality>
       chordsmith progression <tonic> <pattern|preset>
       chordsmith presets
       chordsmith quiz <identify|missing|build> [easy|medium] [--levels <file.yaml>] [--seed <n>]";

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("{}", USAGE);
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "chord" if args.len() == 4 => run_chord(&args[2], &args[3]),
        "progression" if args.len() == 4 => run_progression(&args[2], &args[3]),
        "presets" => {
            for preset in PRESETS {
                println!("{}", preset.name);
            }
            Ok(())
        }
        "quiz" if args.len() >= 3 => run_quiz(&args[2..]),
        _ => {
            eprintln!("{}", USAGE);
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_chord(root: &str, quality: &str) -> Result<(), String> {
    let root: Note = root.parse().map_err(|e| format!("{}", e))?;
    let quality: Quality = quality.parse().map_err(|e| format!("{}", e))?;

    let chord = compose_chord(&root, quality);
    println!("{}", chord.name);
    for note in &chord.notes {
        match note.midi() {
            Some(midi) => println!("  {} (MIDI {})", note, midi),
            None => println!("  {}", note),
        }
    }
    Ok(())
}

fn run_progression(tonic: &str, pattern: &str) -> Result<(), String> {
    let chords = progression_from_str(tonic, pattern).map_err(|e| format!("{}", e))?;
    println!("{}", format_progression(&chords));

    let mut player = ProgressionPlayer::new(chords);
    player.start(false);
    while let Some(played) = player.next_chord(OctaveShift::default()) {
        let notes: Vec<String> = played.notes.iter().map(|n| n.to_string()).collect();
        println!("{}  [{}]", played.status, notes.join(" "));
    }
    Ok(())
}

fn run_quiz(args: &[String]) -> Result<(), String> {
    let kind: QuizKind = args[0].parse().map_err(|e| format!("{}", e))?;
    let mut level = Level::Easy;
    let mut table_path: Option<&String> = None;
    let mut seed: Option<u64> = None;

    // Parse flags
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--levels" => {
                table_path = Some(args.get(i + 1).ok_or("--levels needs a file")?);
                i += 2;
            }
            "--seed" => {
                let text = args.get(i + 1).ok_or("--seed needs a number")?;
                seed = Some(text.parse().map_err(|_| format!("Invalid seed: {}", text))?);
                i += 2;
            }
            other => {
                level = other.parse().map_err(|e| format!("{}", e))?;
                i += 1;
            }
        }
    }

    let table = match table_path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("Error reading file '{}': {}", path, e))?;
            DifficultyTable::from_yaml(&text).map_err(|e| format!("{}", e))?
        }
        None => DifficultyTable::builtin().clone(),
    };
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let session = Session::with_rng(kind, table.profile(level).clone(), rng);
    play(session).map_err(|e| format!("{}", e))
}

fn play(mut session: Session) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut progress = session.next_question();

    loop {
        let question = match progress {
            Progress::Question(question) => question,
            Progress::Complete(summary) => {
                println!("\n{} complete!\n{}", session.kind(), summary.report());
                return Ok(());
            }
            Progress::Aborted { notice, .. } => {
                println!("{}", notice);
                return Ok(());
            }
        };

        println!();
        if let Some(label) = session.progress_label() {
            println!("{}", label);
        }
        println!("{}", question.prompt);
        if session.kind() == QuizKind::Construction {
            println!("  (type notes with their octave, e.g. C4 Eb4 G4)");
        }
        if !question.sound.is_empty() {
            println!("  Notes: {}", join_notes(&question.sound));
        }
        for (n, choice) in question.choices.iter().enumerate() {
            println!("  {}. {}", n + 1, choice);
        }

        loop {
            print!("> ");
            io::stdout().flush()?;
            let Some(line) = lines.next().transpose()? else {
                session.abandon();
                return Ok(());
            };
            let line = line.trim();

            match line {
                "" => continue,
                "quit" => {
                    session.abandon();
                    return Ok(());
                }
                "hint" => {
                    if let Some(hint) = session.hint() {
                        println!("{}", hint.text);
                        if !hint.sound.is_empty() {
                            println!("  Notes: {}", join_notes(&hint.sound));
                        }
                    }
                    continue;
                }
                "replay" => {
                    println!("  Notes: {}", join_notes(&session.replay()));
                    continue;
                }
                _ => {}
            }

            if !answer(&mut session, &question.choices, line) {
                continue;
            }
            match session.submit() {
                Submission::Scored(result) => {
                    println!("{}", session.status_line(&result));
                    if !result.correct {
                        if let Some(text) = session.reveal() {
                            println!("{}", text);
                        }
                    }
                    break;
                }
                Submission::NothingToSubmit => println!("Nothing to submit yet."),
            }
        }

        progress = session.next_question();
    }
}

/// Feed one line of learner input into the session
fn answer(session: &mut Session, choices: &[String], line: &str) -> bool {
    if session.kind() == QuizKind::Identification {
        let choice = match line.parse::<usize>() {
            Ok(n) if (1..=choices.len()).contains(&n) => choices[n - 1].clone(),
            _ => line.to_string(),
        };
        session.select_choice(&choice);
        return true;
    }

    let notes: Result<Vec<Note>, _> = line.split_whitespace().map(str::parse::<Note>).collect();
    let notes = match notes {
        Ok(notes) => notes,
        Err(e) => {
            eprintln!("{}", e);
            return false;
        }
    };

    // Bare names are placed next to the notes on screen
    let shown = session.replay();
    let notes: Vec<Note> = notes.into_iter().map(|n| n.nearest_to(&shown)).collect();
    if notes.iter().any(|n| n.octave().is_none()) {
        eprintln!("Give each note with its octave, e.g. Eb4");
        return false;
    }

    for note in notes {
        session.toggle_note(note);
    }
    true
}

fn join_notes(notes: &[Note]) -> String {
    notes
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
