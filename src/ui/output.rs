//! Output functions for consistent CLI formatting

use super::context::UiContext;
use console::{style, Emoji, Style};
use std::io::{self, Write};

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "");
static WARN: Emoji<'_, '_> = Emoji("⚠ ", "");

/// Display a section header
pub fn section(ctx: &UiContext, title: &str) {
    if ctx.decorated() {
        println!("{}", style(title).cyan().bold());
    } else {
        println!("{}", style(title).bold());
    }
}

/// Display a success step
pub fn step_ok(ctx: &UiContext, message: &str) {
    if ctx.decorated() {
        println!("  {}{}", style(&CHECK).green(), message);
    } else {
        println!("  {} {}", style("[OK]").green(), message);
    }
}

/// Display a success step with detail
pub fn step_ok_detail(ctx: &UiContext, message: &str, detail: &str) {
    if ctx.decorated() {
        println!("  {}{} ({})", style(&CHECK).green(), message, style(detail).dim());
    } else {
        println!("  {} {} ({})", style("[OK]").green(), message, detail);
    }
}

/// Display a warning step with hint
pub fn step_warn_hint(ctx: &UiContext, message: &str, hint: &str) {
    if ctx.decorated() {
        println!("  {}{} - {}", style(&WARN).yellow(), message, style(hint).dim());
    } else {
        println!("  {} {} - {}", style("[WARN]").yellow(), message, hint);
    }
}

/// Display an error step with detail
pub fn step_error_detail(ctx: &UiContext, message: &str, detail: &str) {
    if ctx.decorated() {
        println!("  {}{}: {}", style(&CROSS).red(), message, style(detail).red());
    } else {
        println!("  {} {}: {}", style("[FAIL]").red(), message, detail);
    }
}

/// Print styled key-value pair
pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    if ctx.decorated() {
        println!("  {}: {}", style(key).dim(), value);
    } else {
        println!("  {}: {}", key, value);
    }
}

/// Print styled key-value with status color
pub fn key_value_status(ctx: &UiContext, key: &str, value: &str, ok: bool) {
    let value_style = if ok {
        Style::new().green()
    } else {
        Style::new().yellow()
    };

    if ctx.decorated() {
        println!("  {}: {}", style(key).dim(), value_style.apply_to(value));
    } else {
        let prefix = if ok { "[OK]" } else { "[WARN]" };
        println!("  {} {}: {}", prefix, key, value);
    }
}

/// Ask for confirmation on stdin; non-interactive sessions get `default`
pub fn confirm(ctx: &UiContext, prompt: &str, default: bool) -> bool {
    if ctx.assume_yes() {
        println!("  {} (auto-approved)", prompt);
        return true;
    }
    if !ctx.can_prompt() {
        return default;
    }

    let suffix = if default { "[Y/n]" } else { "[y/N]" };
    print!("  {} {} ", prompt, suffix);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return default;
    }

    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => true,
        "n" | "no" => false,
        _ => default,
    }
}
