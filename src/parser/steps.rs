use crate::models::Step;
use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_MAX_STEPS: usize = 8;

/// Body used when a step heading is followed by nothing but whitespace.
pub const EMPTY_BODY_PLACEHOLDER: &str = "Processing...";

// "### Step 3: Title", "step 3 : Title", "## STEP 3:" ...
static STEP_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:#{1,6}[ \t]*)?step[ \t]*(\d+)[ \t]*:[ \t]*(.*)$")
        .expect("step heading pattern is valid")
});

struct Heading<'a> {
    ordinal: u64,
    title: &'a str,
    start: usize,
    end: usize,
}

/// Split a chain-of-reasoning into its "Step N: Title" blocks.
///
/// A block runs from its heading to the next heading (or end of text). The
/// number in the heading is kept as written, so gaps and repeats survive.
/// Text without any heading yields an empty list.
pub fn extract_steps(reasoning: &str, max_steps: usize) -> Vec<Step> {
    if reasoning.trim().is_empty() || max_steps == 0 {
        return Vec::new();
    }

    let headings: Vec<Heading> = STEP_HEADING
        .captures_iter(reasoning)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            // Digits only, so the parse can fail solely on overflow.
            let ordinal = caps.get(1)?.as_str().parse().unwrap_or(u64::MAX);
            Some(Heading {
                ordinal,
                title: caps.get(2).map(|m| m.as_str()).unwrap_or(""),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect();

    headings
        .iter()
        .enumerate()
        .take(max_steps)
        .map(|(i, heading)| {
            let block_end = headings
                .get(i + 1)
                .map(|next| next.start)
                .unwrap_or(reasoning.len());
            build_step(heading, &reasoning[heading.end..block_end])
        })
        .collect()
}

fn build_step(heading: &Heading, block: &str) -> Step {
    let mut lines = block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty());

    let mut title = heading.title.trim().to_string();
    if title.is_empty() {
        // "Step 2:" alone on its line, title on the next one
        title = lines.next().unwrap_or_default().to_string();
    }

    let body = lines.collect::<Vec<_>>().join(" ");
    let body = if body.is_empty() {
        EMPTY_BODY_PLACEHOLDER.to_string()
    } else {
        body
    };

    Step {
        ordinal: heading.ordinal,
        title,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_STEPS: &str = "\
### Step 1: Read input
Parse the array.
### Step 2: Build map
Store value -> index.
### Step 3: Scan
Look for complement.
### Step 4: Return
Return both indices.
### Step 5: Edge cases
Handle empty arrays.";

    #[test]
    fn test_no_headings_is_empty() {
        assert!(extract_steps("", DEFAULT_MAX_STEPS).is_empty());
        assert!(extract_steps("Just use a hash map.\nDone.", DEFAULT_MAX_STEPS).is_empty());
    }

    #[test]
    fn test_gap_numbering_kept_in_order() {
        let reasoning = "### Step 1: A\nfirst\n\n### Step 2: B\nsecond\n### Step 4: C\nthird";
        let steps = extract_steps(reasoning, DEFAULT_MAX_STEPS);

        assert_eq!(steps.len(), 3);
        assert_eq!(steps.iter().map(|s| s.ordinal).collect::<Vec<_>>(), vec![1, 2, 4]);
        assert_eq!(steps[2].title, "C");
        assert_eq!(steps[2].body, "third");
    }

    #[test]
    fn test_duplicate_numbers_preserved() {
        let steps = extract_steps("Step 1: A\nx\nStep 1: B\ny", DEFAULT_MAX_STEPS);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].ordinal, 1);
        assert_eq!(steps[1].ordinal, 1);
        assert_eq!(steps[1].title, "B");
    }

    #[test]
    fn test_max_steps_truncates() {
        let steps = extract_steps(FIVE_STEPS, 2);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].title, "Read input");
        assert_eq!(steps[1].title, "Build map");

        assert_eq!(extract_steps(FIVE_STEPS, DEFAULT_MAX_STEPS).len(), 5);
    }

    #[test]
    fn test_body_lines_joined_with_single_spaces() {
        let reasoning = "Intro noise\n\n### Step 1: Sort\n  Sort the list.  \n\n   Then dedupe.\n\n";
        let steps = extract_steps(reasoning, DEFAULT_MAX_STEPS);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].body, "Sort the list. Then dedupe.");
    }

    #[test]
    fn test_missing_body_gets_placeholder() {
        let steps = extract_steps("### Step 1: Only a title\n### Step 2: Another\n", DEFAULT_MAX_STEPS);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].body, EMPTY_BODY_PLACEHOLDER);
        assert_eq!(steps[1].body, EMPTY_BODY_PLACEHOLDER);
    }

    #[test]
    fn test_case_insensitive_and_unprefixed() {
        let steps = extract_steps("STEP 1: Loud\nbody\n  step 2 : quiet\nbody two", DEFAULT_MAX_STEPS);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].title, "Loud");
        assert_eq!(steps[1].title, "quiet");
        assert_eq!(steps[1].body, "body two");
    }

    #[test]
    fn test_title_on_following_line() {
        let steps = extract_steps("### Step 1:\nInitialize pointers\nleft = 0, right = n - 1", DEFAULT_MAX_STEPS);
        assert_eq!(steps[0].title, "Initialize pointers");
        assert_eq!(steps[0].body, "left = 0, right = n - 1");
    }

    #[test]
    fn test_inline_mention_is_not_a_heading() {
        let steps = extract_steps("### Step 1: Loop\nRepeat as in Step 1: until done", DEFAULT_MAX_STEPS);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].body, "Repeat as in Step 1: until done");
    }

    #[test]
    fn test_oversized_ordinal_still_starts_a_block() {
        let reasoning = "### Step 1: Setup\nInit.\n### Step 99999999999999999999999: Huge\nStill a step.";
        let steps = extract_steps(reasoning, DEFAULT_MAX_STEPS);

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].body, "Init.");
        assert_eq!(steps[1].ordinal, u64::MAX);
        assert_eq!(steps[1].title, "Huge");
        assert_eq!(steps[1].body, "Still a step.");
    }
}
