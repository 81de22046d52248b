// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use gqlms::errors::{ProbeError, ProbeResult};
use gqlms::orchestrator::Confirm;
use std::io::{BufRead, Write};

/// Asks on the terminal before testing without headers that were never sent
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm_missing_headers(&self, missing: &[&str]) -> ProbeResult<bool> {
        println!();
        println!(
            "[!] The following headers were not found in the request: {}",
            missing.join(", ")
        );
        print!("Do you want to continue anyway? [Y/n]: ");
        std::io::stdout().flush()?;

        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;

        parse_answer(&answer)
    }
}

fn parse_answer(answer: &str) -> ProbeResult<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" => Ok(true),
        "n" => Ok(false),
        _ => Err(ProbeError::config("Invalid input. Please use Y or n.")),
    }
}
