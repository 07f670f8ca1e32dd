//! Console output formatter for answers and REPL screens

use colored::Colorize;

/// Questions offered by `/sample`.
pub const SAMPLE_QUESTIONS: [&str; 6] = [
    "How many board games do we have in stock?",
    "What are our top 3 selling games?",
    "What was our profit margin on game sales?",
    "What were our total operating expenses in January?",
    "Which food items have the highest profit margin?",
    "What's our net profit after all expenses?",
];

/// Formats assistant output for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Welcome banner shown when the REPL starts or the screen is cleared
    pub fn welcome(backend: &str, model: &str) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Board Game Cafe Assistant"));
        output.push('\n');
        output.push_str("I can help you answer questions about our cafe's data:\n\n");
        for (topic, detail) in [
            ("Inventory", "Board games in stock, prices, categories"),
            ("Sales", "Game sales history, revenue, top sellers"),
            ("Table Rentals", "Bookings, revenue, popular times"),
            ("Food & Beverage", "Menu, order history, popular items"),
            ("Expenses", "Rent, labor and other monthly costs"),
        ] {
            output.push_str(&format!("  * {} - {}\n", topic.bold(), detail));
        }
        output.push('\n');
        output.push_str(&format!("{} {} ({})\n\n", "Backend:".cyan().bold(), backend, model));
        output.push_str(&format!(
            "{}\n",
            "Type /help for commands or /quit to exit.".dimmed()
        ));
        output
    }

    /// Command reference for `/help`
    pub fn help() -> String {
        let commands = [
            ("/help, /h, /?", "Show this help message"),
            ("/tables", "Show database schema"),
            ("/sample", "Show sample questions"),
            ("/clear", "Clear the screen"),
            ("/history", "Clear conversation history"),
            ("/quit, /exit, /q", "Exit the assistant"),
        ];
        let mut output = format!("\n{}\n", "Commands:".cyan().bold());
        for (command, description) in commands {
            output.push_str(&format!("  {:<18} {}\n", command.bold(), description));
        }
        output.push_str("\nOr just ask a question in plain English!\n");
        output
    }

    /// Schema listing for `/tables`
    pub fn tables(schema: &str) -> String {
        format!("\n{}\n\n{}\n", "Database Tables".cyan().bold(), schema.trim_end())
    }

    /// Numbered sample questions for `/sample`
    pub fn samples() -> String {
        let mut output = format!("\n{}\n\n", "Sample questions you can ask:".bold());
        for (i, question) in SAMPLE_QUESTIONS.iter().enumerate() {
            output.push_str(&format!("  {} {}\n", format!("{}.", i + 1).dimmed(), question));
        }
        output
    }

    /// Echo of a one-shot question
    pub fn question(question: &str) -> String {
        format!("{} {}", "Question:".bold(), question)
    }

    /// The final answer framed under a green header
    pub fn answer(text: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", "── Answer ──".green().bold()));
        output.push_str(text.trim());
        output.push('\n');
        output
    }

    /// A question that failed for good
    pub fn error(message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!(
            "{}\n{}\n{}\n",
            line.cyan(),
            format!("  {}", title).cyan().bold(),
            line.cyan()
        )
    }
}
