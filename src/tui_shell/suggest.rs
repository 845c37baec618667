use super::CommandDef;

pub(super) fn score_match(q: &str, candidate: &str) -> i32 {
    let q = q.to_lowercase();
    let c = candidate.to_lowercase();
    if c == q {
        return 100;
    }
    if c.starts_with(&q) {
        return 50 - (c.len() as i32 - q.len() as i32);
    }
    if c.contains(&q) {
        return 10;
    }
    0
}

fn best_score(q: &str, def: &CommandDef) -> i32 {
    def.aliases
        .iter()
        .map(|a| score_match(q, a))
        .fold(score_match(q, def.name), i32::max)
}

/// Commands matching the first word of `line`, best first. Ties keep `defs` order,
/// so node verbs listed ahead of global commands stay ahead.
pub(super) fn suggestions(line: &str, defs: &[CommandDef]) -> Vec<CommandDef> {
    let line = line.trim_start().trim_start_matches('/');
    let Some(q) = line.split_whitespace().next() else {
        return Vec::new();
    };
    if line.contains(char::is_whitespace) {
        // Arguments are being typed; the command is settled.
        return Vec::new();
    }
    let mut scored: Vec<(i32, usize, CommandDef)> = defs
        .iter()
        .enumerate()
        .map(|(i, d)| (best_score(q, d), i, *d))
        .filter(|(s, _, _)| *s > 0)
        .collect();
    scored.sort_by(|(sa, ia, _), (sb, ib, _)| sb.cmp(sa).then(ia.cmp(ib)));

    let mut out: Vec<CommandDef> = Vec::with_capacity(scored.len());
    for (_, _, d) in scored {
        if !out.iter().any(|o| o.name == d.name) {
            out.push(d);
        }
    }
    out
}

#[cfg(test)]
#[path = "../tests/tui_shell/suggest_tests.rs"]
mod tests;
