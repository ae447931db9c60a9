//! Synthetic export generator for stress testing chatpulse.
//!
//! Writes a `conversations.json` (and a `user.json`) shaped like a ChatGPT
//! data export, including the odd records real exports contain: missing
//! timestamps, `null` content, attachment parts and unmodeled roles.
//!
//! Usage: cargo run --features gen-test --bin gen_export -- [conversations] [output_dir] [days]
//! Example: cargo run --features gen-test --bin gen_export -- 20000 stress_export 730

use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::{Value, json};

const START_EPOCH: i64 = 1_669_766_400; // 2022-11-30 00:00:00 UTC

const USER_MESSAGES: &[&str] = &[
    "Can you explain how async works in Rust?",
    "Thank you, that was really helpful!",
    "Please help me debug this python function",
    "¿Puedes explicarme cómo funciona una API REST?",
    "Gracias, eso es excelente 😀",
    "What is the difference between SQL and NoSQL databases?",
    "This is terrible, the code still has an error",
    "Write a javascript function that sorts an array",
    "How do I deploy a docker container to kubernetes?",
    "I love this answer 🚀🔥",
    "Necesito ayuda con machine learning por favor",
    "Check https://example.com/docs?page=2 and tell me what you think",
];

const ASSISTANT_MESSAGES: &[&str] = &[
    "Sure! Here is an example:\n```rust\nfn main() { println!(\"hi\"); }\n```",
    "Great question. Let me explain step by step.",
    "You can use `sorted()` in Python:\n```python\ndef f(xs):\n    return sorted(xs)\n```",
    "¡Claro! Con gusto te ayudo. Una API REST usa HTTP.",
    "Here is a function that should work: function sortArray(a) { return a.sort(); }",
    "I'm sorry, that sounds frustrating. Let's fix the bug.",
    "See https://doc.rust-lang.org/book/ for more details.",
];

const TITLES: &[&str] = &[
    "Rust async",
    "Python debugging",
    "API REST",
    "Docker deploy",
    "Machine learning",
    "Sorting in JavaScript",
    "Database design",
    "Random chat",
];

fn main() {
    let args: Vec<String> = env::args().collect();

    let count: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(10_000);
    let output = args.get(2).map(|s| s.as_str()).unwrap_or("synthetic_export");
    let days: i64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(365).max(1);

    println!("🧪 Export Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Conversations: {}", count);
    println!("   Output dir:    {}", output);
    println!("   Span:          {} days", days);
    println!();

    if let Err(e) = generate(count, Path::new(output), days) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn generate(count: usize, dir: &Path, days: i64) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let file = File::create(dir.join("conversations.json"))?;
    let mut writer = BufWriter::with_capacity(1024 * 1024, file);
    let mut rng = rand::thread_rng();

    let start = Instant::now();
    let mut bytes_written: usize = 0;

    writeln!(writer, "[")?;
    for i in 0..count {
        let record = generate_conversation(&mut rng, i, days);
        let line = serde_json::to_string(&record)?;
        let comma = if i + 1 < count { "," } else { "" };
        bytes_written += line.len();
        writeln!(writer, "  {}{}", line, comma)?;

        if (i + 1) % 1000 == 0 {
            let elapsed = start.elapsed().as_secs_f64();
            eprint!(
                "\r   Generated {}/{} ({:.1} MB, {:.0} conv/s)",
                i + 1,
                count,
                bytes_written as f64 / 1_000_000.0,
                (i + 1) as f64 / elapsed
            );
        }
    }
    writeln!(writer, "]")?;
    writer.flush()?;
    eprintln!();

    fs::write(
        dir.join("user.json"),
        serde_json::to_string_pretty(&json!({
            "id": "user-synthetic",
            "email": "synthetic@example.com",
            "chatgpt_plus_user": false
        }))?,
    )?;

    println!("✅ Done in {:.2}s", start.elapsed().as_secs_f64());
    println!("   Size: {:.2} MB", bytes_written as f64 / 1_000_000.0);
    Ok(())
}

fn generate_conversation(rng: &mut impl Rng, index: usize, days: i64) -> Value {
    // Bursty activity: most conversations land in the first half of the span.
    let day = if rng.gen_bool(0.7) {
        rng.gen_range(0..(days + 1) / 2)
    } else {
        rng.gen_range(0..days)
    };
    let create_time = START_EPOCH + day * 86_400 + rng.gen_range(0..86_400);

    let mut mapping = serde_json::Map::new();
    mapping.insert(
        "root".to_string(),
        json!({"id": "root", "message": null, "parent": null, "children": []}),
    );

    let turns = rng.gen_range(0..12);
    for turn in 0..turns {
        let id = format!("n{turn}");
        mapping.insert(id.clone(), json!({"id": id, "message": generate_message(rng, turn)}));
    }

    let timestamp = match rng.gen_range(0..50) {
        0 => Value::Null,
        1 => json!(0),
        2 => json!(create_time.to_string()),
        _ => json!(create_time as f64 + rng.gen_range(0.0..1.0)),
    };

    json!({
        "id": format!("conv-{index}"),
        "title": TITLES.choose(rng).copied().unwrap_or("Untitled"),
        "create_time": timestamp,
        "mapping": mapping,
    })
}

fn generate_message(rng: &mut impl Rng, turn: usize) -> Value {
    let (role, pool) = match (turn % 2, rng.gen_range(0..40)) {
        (_, 0) => ("tool", ASSISTANT_MESSAGES),
        (_, 1) => ("system", ASSISTANT_MESSAGES),
        (0, _) => ("user", USER_MESSAGES),
        _ => ("assistant", ASSISTANT_MESSAGES),
    };
    let text = pool.choose(rng).copied().unwrap_or_default();

    let content = match rng.gen_range(0..30) {
        0 => Value::Null,
        1 => json!({"content_type": "multimodal_text", "parts": [{"asset_pointer": "file-service://x"}, text]}),
        2 => json!(text),
        _ => json!({"content_type": "text", "parts": [text]}),
    };

    json!({"author": {"role": role}, "content": content})
}
