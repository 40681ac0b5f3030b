//! Basic example of solving a puzzle and replaying its trace

use replay_core::{Difficulty, Event, Generator, ReplaySession, TracingSolver};

fn main() {
    // Generate a puzzle
    println!("Generating an Easy difficulty puzzle...\n");
    let mut generator = Generator::with_seed(42);
    let puzzle = generator.generate(Difficulty::Easy);

    println!("Puzzle:");
    println!("{}", puzzle);
    println!("Given cells: {}", puzzle.filled_count());

    // Solve it, recording every propagation and search event
    let report = TracingSolver::new().solve(&puzzle);
    println!(
        "\nSolved in {:.2} ms, {} trace events",
        report.time_taken_ms, report.num_steps
    );

    // Replay the trace step by step
    let mut session = match ReplaySession::from_report(puzzle, &report) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Cannot replay: {}", e);
            return;
        }
    };

    println!("\nFirst ten trace events:");
    while session.cursor() < 9 && session.step_forward() {
        let event = session.current_event().unwrap();
        println!("  step {:>2}: {}", session.cursor() + 1, event);
    }

    // Jump straight to the last backtracking assignment, if any
    let last_assign = session
        .trace()
        .events()
        .iter()
        .rposition(|e| matches!(e, Event::BacktrackAssign { .. }));
    if let Some(index) = last_assign {
        session.jump_to(index as isize);
        println!(
            "\nAt step {} the search holds {} tentative assignment(s)",
            index + 1,
            session.overlay().len()
        );
    } else {
        println!("\nPropagation alone solved this puzzle, no search needed");
    }

    // The end of the trace agrees with the reported solution
    session.jump_to(session.trace_len() as isize - 1);
    let solution = report.solution.expect("report is solvable");
    println!("\nSolution:");
    println!("{}", solution);

    let converged = session
        .domains()
        .iter()
        .filter(|(pos, domain)| domain.sole_value() == Some(solution.get(*pos)))
        .count();
    println!(
        "{} of {} variables converged on their solution value",
        converged,
        session.domains().len()
    );

    // Rewind to the untouched initial state
    session.jump_to(-1);
    println!(
        "Rewound to the initial state: {} events applied",
        session.cursor() + 1
    );
}
