//! The `quizforge init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizforge.toml").exists() {
        println!("quizforge.toml already exists, skipping.");
    } else {
        std::fs::write("quizforge.toml", SAMPLE_CONFIG)?;
        println!("Created quizforge.toml");
    }

    std::fs::create_dir_all("problems")?;
    let example_path = std::path::Path::new("problems/example.json");
    if example_path.exists() {
        println!("problems/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_PROBLEM)?;
        println!("Created problems/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Pick a profile in quizforge.toml");
    println!("  2. Run: quizforge validate --problem problems");
    println!("  3. Run: quizforge capabilities");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizforge configuration
# Profiles: "default", "strict", "lenient". QUIZFORGE_PROFILE overrides this.
profile = "default"

# Uncomment keys to override the profile's values.
[grading]
# rounding = "round"            # round, floor or ceil
# apply_minimum_thresholds = false
# keyword_threshold = 0.5

[tags]
# similarity_threshold = 0.6
# max_suggestions = 5
# max_tags_per_problem = 10
"#;

const EXAMPLE_PROBLEM: &str = r#"{
  "teacherId": "teacher-1",
  "content": {
    "type": "multiple_choice",
    "title": "Which planet is known as the red planet?",
    "choices": [
      { "id": "a", "text": "Venus" },
      { "id": "b", "text": "Mars" },
      { "id": "c", "text": "Jupiter" },
      { "id": "d", "text": "Saturn" }
    ]
  },
  "correctAnswer": {
    "type": "multiple_choice",
    "points": 10,
    "correctChoices": ["b"]
  },
  "difficulty": 1,
  "tags": ["astronomy", "planets"]
}
"#;
