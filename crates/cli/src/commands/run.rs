use anyhow::Result;
use colored::*;
use frigg_core::project::ProjectRunner;

pub async fn execute(runner: &ProjectRunner) -> Result<i32> {
    let report = runner
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run tasks: {}", e))?;

    println!();
    if report.success() {
        println!(
            "{} {}",
            "✓".green().bold(),
            "All tasks completed successfully!".green().bold()
        );
    } else {
        let verdict = report.verdict;
        let failed = verdict.failed_main + verdict.failed_setup;
        println!(
            "{} {}",
            "✗".red().bold(),
            format!("Build failed ({} failed task(s))", failed).red().bold()
        );
    }

    Ok(report.exit_code())
}
