use anyhow::Result;
use colored::*;
use frigg_core::project::ProjectRunner;

pub fn execute(runner: &ProjectRunner) -> Result<i32> {
    println!(
        "{} {}",
        "Execution plan for".bold(),
        runner.directory.display().to_string().cyan()
    );

    println!("\n{}:", "Execution order".bold());
    for (i, task) in runner.plan().iter().enumerate() {
        if task.is_setup_task() {
            println!("  {}. {} {}", i + 1, task, "[setup]".bright_black());
        } else {
            println!("  {}. {}", i + 1, task);
        }
    }

    Ok(0)
}
