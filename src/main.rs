//! # chatpulse CLI
//!
//! Command-line interface for the chatpulse library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use chatpulse::ChatpulseError;
use chatpulse::cli::Args;
use chatpulse::core::{Analyzer, apply_filters, finalize};
use chatpulse::format::{OutputFormat, write_to_format};
use chatpulse::logging;
use chatpulse::parser::ExportParser;
use chatpulse::progress::stderr_progress;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ChatpulseError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();

    let config = args.build_config()?;
    logging::init(&config.logging, args.verbose);

    let output_path = args.output_path();
    let format: OutputFormat = args.format.into();

    // Print header
    println!("📈 chatpulse v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input);
    println!("💾 Output:  {}", output_path.display());
    println!("📄 Format:  {}", format);
    println!("💬 Sentiment: {}", config.analysis.sentiment);

    let filter_config = args.filter_config(config.analysis.time_basis)?;
    if let Some(ref after) = args.after {
        println!("📅 After:   {}", after);
    }
    if let Some(ref before) = args.before {
        println!("📅 Before:  {}", before);
    }
    if let Some(ref title) = args.title {
        println!("🏷️  Title:   {}", title);
    }
    println!();

    // Step 1: Load
    println!("⏳ Loading export...");
    let load_start = Instant::now();
    let export = ExportParser::with_config(config.input.clone()).parse(&args.input)?;
    let original_count = export.conversations.len();
    println!(
        "   Found {} conversations ({:.2}s)",
        original_count,
        load_start.elapsed().as_secs_f64()
    );

    // Step 2: Filter
    let conversations = if filter_config.is_active() {
        println!("🔍 Filtering conversations...");
        let filter_start = Instant::now();
        let filtered = apply_filters(export.conversations, &filter_config);
        println!(
            "   {} conversations after filtering ({:.2}s)",
            filtered.len(),
            filter_start.elapsed().as_secs_f64()
        );
        filtered
    } else {
        export.conversations
    };

    // Step 3: Analyze
    println!("🧮 Analyzing...");
    let analyze_start = Instant::now();
    let analyzer = Analyzer::new(config.analysis.clone()).with_progress(stderr_progress());
    let report = if args.jobs > 1 {
        finalize(analyzer.walk_partitioned(&conversations, args.jobs), analyzer.config())
    } else {
        analyzer.analyze(&conversations)
    };
    let report = report.with_user_profile(export.user_profile);
    println!(
        "   {} messages, {} words ({:.2}s)",
        report.total_messages,
        report.total_words,
        analyze_start.elapsed().as_secs_f64()
    );

    // Step 4: Write
    println!("💾 Writing {}...", format);
    let write_start = Instant::now();
    write_to_format(&report, &output_path, format, args.template.as_deref())?;
    println!("   Written in {:.2}s", write_start.elapsed().as_secs_f64());

    let total_time = total_start.elapsed();

    println!();
    println!("✅ Done! Output saved to {}", output_path.display());

    // Summary
    println!();
    println!("📊 Summary:");
    println!("   Conversations: {}", report.total_conversations);
    if filter_config.is_active() {
        println!("   Filtered out:  {}", original_count - conversations.len());
    }
    println!("   Messages:      {}", report.total_messages);
    println!("   Words:         {}", report.total_words);
    if let Some(days) = &report.days_analysis {
        println!(
            "   Active days:   {}/{} ({:.1}%)",
            days.active_days, days.total_days, days.active_percentage
        );
        println!("   Longest streak: {} days", days.longest_active_streak);
    }
    if let Some(day) = report.most_active_day {
        println!("   Busiest day:   {}", day);
    }

    // Performance stats
    println!();
    println!("⚡ Performance:");
    println!("   Total time:  {:.2}s", total_time.as_secs_f64());
    let per_sec = original_count as f64 / total_time.as_secs_f64();
    println!("   Throughput:  {:.0} conversations/sec", per_sec);

    Ok(())
}
