//! List rules command implementation.

use selector_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<30} Description", "Code", "Name");
    println!("{}", "-".repeat(100));

    for rule in all_rules() {
        println!(
            "{:<10} {:<30} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
        let diagnostics = rule.diagnostics();
        if diagnostics.len() > 1 {
            for d in diagnostics {
                println!("  {:<8} {:<30} selector unusable {}", d.code, "", d.concern);
            }
        }
    }

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  selector-lint check --rules incorrect-ignore-expression");
    println!("  selector-lint check --rules TH1001,TH1002");
}
