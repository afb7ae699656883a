//! Prompt builders for the jury review.
//!
//! Both variants share the framing, the six-category rubric and the exact
//! JSON schema the reply extractor understands. The per-commit variant
//! additionally asks the model to infer AI assistance from the commit
//! itself.

use repo_snapshot::{AnalysisResult, CommitRecord};

/// Required reply shape, shown verbatim to the model.
pub const RESPONSE_SCHEMA: &str = r#"{
  "scores": {
    "relevance": 0,
    "performance": 0,
    "security": 0,
    "cost": 0,
    "vulnerability": 0,
    "aiUsage": 0,
    "total": 0
  },
  "explanations": {
    "relevance": "",
    "performance": "",
    "security": "",
    "cost": "",
    "vulnerability": "",
    "aiUsage": ""
  }
}"#;

/// Separator between commit blocks in the batch variant.
const COMMIT_SEPARATOR: &str = "\n---\n";

/// Renders one commit as a labelled block.
pub fn format_commit(commit: &CommitRecord) -> String {
    format!(
        "Commit: {hash}\n\
         Author: {author} ({email})\n\
         Date: {date}\n\
         Message: {message}\n\
         Files Changed: {files}\n\
         Diff:\n{diff}\n",
        hash = commit.hash,
        author = commit.author,
        email = commit.email,
        date = commit.timestamp,
        message = commit.message,
        files = commit.changed_files.join(", "),
        diff = commit.diff,
    )
}

/// Prompt for reviewing the whole history at once.
pub fn build_batch_prompt(problem_statement: &str, team_summary: &str, commits: &[CommitRecord]) -> String {
    let history = commits
        .iter()
        .map(format_commit)
        .collect::<Vec<_>>()
        .join(COMMIT_SEPARATOR);

    let mut s = String::new();
    s.push_str(
        "You are an expert AI jury for a hackathon. A team has submitted the following \
         GitHub commit history for a project solving this problem:\n",
    );
    push_context(&mut s, problem_statement, team_summary);
    s.push_str("\nCommit History:\n");
    s.push_str(&history);
    s.push('\n');
    push_rubric(
        &mut s,
        "the code and development process",
        "Determine if AI tools were used based on commit structure, naming, comments, and messages",
    );
    s
}

/// Prompt for reviewing a single commit; `position` is 1-based.
pub fn build_commit_prompt(
    problem_statement: &str,
    team_summary: &str,
    commit: &CommitRecord,
    position: usize,
    total_commits: usize,
) -> String {
    let mut s = String::new();
    s.push_str(&format!(
        "You are an expert AI jury for a hackathon. A team is solving the problem below. \
         You are reviewing commit {position} of {total_commits} of their history, in \
         chronological order.\n"
    ));
    push_context(&mut s, problem_statement, team_summary);
    s.push_str("\nCommit:\n");
    s.push_str(&format_commit(commit));
    s.push('\n');
    push_rubric(
        &mut s,
        "this commit",
        "Infer whether AI assistance was used from the commit message phrasing, \
         the style of code comments, and naming patterns in the diff",
    );
    s
}

fn push_context(s: &mut String, problem_statement: &str, team_summary: &str) {
    s.push_str("\nProblem Statement:\n");
    s.push_str(problem_statement.trim());
    s.push_str("\n\nTeam Summary:\n");
    s.push_str(team_summary.trim());
    s.push('\n');
}

fn push_rubric(s: &mut String, subject: &str, ai_usage_hint: &str) {
    s.push_str(&format!(
        "\nEvaluate {subject} using these categories:\n\
         1. Relevance (out of 10)\n\
         2. Performance (out of 10)\n\
         3. Security (out of 10)\n\
         4. Cost (out of 10)\n\
         5. Vulnerability (out of 10)\n\
         6. Smart AI Usage (out of 10) - {ai_usage_hint}\n\
         \n\
         Give a score out of 10 for each, along with a short justification.\n\
         Also calculate a final score by adding all scores and multiplying by 1.67 to get a result out of 100.\n\
         \n\
         Return your evaluation in this exact JSON format:\n"
    ));
    s.push_str(RESPONSE_SCHEMA);
    s.push('\n');
}

/// One-paragraph description of a team derived from its history.
pub fn summarize_team(team_name: &str, repo_url: &str, analysis: &AnalysisResult) -> String {
    let commits = analysis.commits.len();
    let authors = analysis.distinct_authors();
    let mut s = format!(
        "Team \"{team_name}\" submitted repository {repo_url} with {commits} commit(s) by {authors} author(s)."
    );
    if let (Some(first), Some(last)) = (analysis.commits.first(), analysis.commits.last()) {
        s.push_str(&format!(
            " History spans {} to {}.",
            first.timestamp, last.timestamp
        ));
    }
    if let Some(files) = &analysis.files {
        s.push_str(&format!(" The final tree contains {} text file(s).", files.len()));
    }
    s
}
