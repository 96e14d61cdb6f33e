pub const SAMPLE_CATALOG: &str = r#"{
  "prompts": [
    {
      "id": "C01",
      "category": "coding",
      "subcategory": "implementation",
      "difficulty": "easy",
      "prompt": "Write a Rust function that returns the n-th Fibonacci number using iteration.",
      "ideal": "An iterative loop with two accumulators, using u64 and handling n = 0.",
      "criteria": ["iterative, not recursive", "handles n = 0 and n = 1", "compiles"],
      "checks": { "must_contain": ["fn"], "must_not_contain": ["todo!"], "max_words": 400 }
    },
    {
      "id": "L01",
      "category": "logic",
      "subcategory": "arithmetic",
      "difficulty": "easy",
      "prompt": "A bat and a ball cost $1.10 in total. The bat costs $1.00 more than the ball. How much does the ball cost?",
      "ideal": "$0.05",
      "criteria": "States 5 cents and shows why 10 cents is wrong.",
      "checks": { "regex": "(0\\.05|5 cents|five cents)" }
    },
    {
      "id": "W01",
      "category": "writing",
      "subcategory": "summary",
      "difficulty": "medium",
      "prompt": "Summarise the trade-offs between optimistic and pessimistic locking in three sentences.",
      "ideal": "Optimistic locking avoids lock overhead but retries on conflict; pessimistic locking blocks early and suits high contention.",
      "criteria": ["exactly three sentences", "mentions contention", "mentions retries or conflicts"],
      "checks": { "max_words": 120 }
    }
  ]
}
"#;
