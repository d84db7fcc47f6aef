//! External tool availability.

use console::style;
use notice::config::Settings;
use notice_analysis::check_tools;

pub fn cmd_check(settings: &Settings) -> anyhow::Result<()> {
    println!("\n{}", style("Text Tool Status").bold());
    println!("{}", "-".repeat(40));

    let tools = check_tools(settings);
    for tool in &tools {
        match tool.path {
            Some(ref path) => println!(
                "  {:<12} {} {}",
                tool.name,
                style("✓ found").green(),
                style(path.display()).dim()
            ),
            None => println!(
                "  {:<12} {} {}",
                tool.name,
                style("✗ not found").red(),
                style(format!("({}: {})", tool.command, tool.hint)).dim()
            ),
        }
    }

    let missing = tools.iter().filter(|tool| !tool.is_available()).count();
    println!();
    if missing == 0 {
        println!("{} All text tools available", style("✓").green());
    } else {
        println!(
            "{} {} tools missing; notices that need them fall back to webpage text",
            style("!").yellow(),
            missing
        );
    }
    Ok(())
}
