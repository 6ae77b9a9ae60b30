//! `ci last`: summary of the most recent CI test run of a pipeline.

use crate::error::CiError;
use crate::output::{self, Ui};
use crate::platform::{Pipeline, PlatformApi, TestNode, TestRun};

const SHORT_SHA_LEN: usize = 7;

/// How the pipeline to inspect is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineSelector {
    /// A pipeline given by name or id.
    Named(String),
    /// The pipeline the app is coupled to.
    App(String),
}

impl PipelineSelector {
    pub fn resolve(&self, api: &dyn PlatformApi) -> Result<Pipeline, CiError> {
        let pipeline = match self {
            PipelineSelector::Named(pipeline) => api.pipeline(pipeline)?,
            PipelineSelector::App(app) => api.pipeline_coupling(app)?.pipeline,
        };
        tracing::debug!(pipeline = %pipeline.name, id = %pipeline.id, "resolved pipeline");
        Ok(pipeline)
    }
}

/// Show the newest test run of the selected pipeline.
///
/// Returns `None` when the pipeline has never run tests. With `node`, only
/// that test node is shown, followed by where its output can be read.
pub fn last(
    api: &dyn PlatformApi,
    selector: &PipelineSelector,
    node: Option<u32>,
    ui: &mut dyn Ui,
) -> Result<Option<TestRun>, CiError> {
    let pipeline = selector.resolve(api)?;

    let latest = api.latest_test_runs(&pipeline.id)?;
    let Some(newest) = latest.first() else {
        ui.warn("No CI runs found for the specified app and/or pipeline.");
        return Ok(None);
    };

    let run = api.test_run(&pipeline.id, newest.number)?;
    let nodes = api.test_nodes(&run.id)?;

    let shown: Vec<&TestNode> = match node {
        Some(index) => {
            let found = nodes.iter().find(|n| n.index == index).ok_or_else(|| {
                CiError::NodeNotFound {
                    node: index,
                    available: nodes.iter().map(|n| n.index.to_string()).collect(),
                }
            })?;
            vec![found]
        }
        None => nodes.iter().collect(),
    };

    let mut lines = describe_test_run(&run, &shown);
    if let Some(url) = node
        .and_then(|_| shown.first())
        .and_then(|n| n.output_stream_url.as_deref())
    {
        lines.push(format!("Output:  {url}"));
    }
    for line in lines {
        ui.log(&line);
    }
    Ok(Some(run))
}

/// Summary lines for a test run and the given nodes.
pub fn describe_test_run(run: &TestRun, nodes: &[&TestNode]) -> Vec<String> {
    let mut lines = vec![output::header(&format!(
        "Test run #{} {}",
        run.number, run.status
    ))];

    if let Some(branch) = &run.commit_branch {
        lines.push(format!("Branch:  {branch}"));
    }
    if let Some(sha) = &run.commit_sha {
        let short = sha.get(..SHORT_SHA_LEN).unwrap_or(sha);
        match run.commit_message.as_deref().and_then(|m| m.lines().next()) {
            Some(message) => lines.push(format!("Commit:  {short} {message}")),
            None => lines.push(format!("Commit:  {short}")),
        }
    }
    if let Some(created_at) = run.created_at {
        lines.push(format!(
            "Created: {}",
            created_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    if let Some(message) = run.message.as_deref().filter(|m| !m.is_empty()) {
        lines.push(format!("Message: {message}"));
    }

    for node in nodes {
        lines.push(describe_node(node));
    }
    lines
}

fn describe_node(node: &TestNode) -> String {
    match node.exit_code {
        Some(code) => format!("  node {}: {} (exit {code})", node.index, node.status),
        None => format!("  node {}: {}", node.index, node.status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakePlatform, Recorder};
    use chrono::{TimeZone, Utc};

    fn pipeline() -> Pipeline {
        Pipeline {
            id: "pipe-1".to_string(),
            name: "shop".to_string(),
        }
    }

    fn run(number: u64) -> TestRun {
        TestRun {
            id: format!("run-{number}"),
            number,
            status: "succeeded".to_string(),
            commit_branch: Some("main".to_string()),
            commit_sha: Some("0123456789abcdef".to_string()),
            commit_message: Some("Fix checkout\n\nlonger body".to_string()),
            created_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()),
            message: None,
        }
    }

    fn node(index: u32, status: &str, exit_code: Option<i32>) -> TestNode {
        TestNode {
            index,
            status: status.to_string(),
            exit_code,
            output_stream_url: None,
        }
    }

    fn platform_with_run() -> FakePlatform {
        let mut platform = FakePlatform {
            pipelines: vec![pipeline()],
            test_runs: vec![run(42)],
            ..FakePlatform::default()
        };
        platform.test_nodes.insert(
            "run-42".to_string(),
            vec![
                node(0, "succeeded", Some(0)),
                TestNode {
                    output_stream_url: Some("https://logs.example.com/run-42/1".to_string()),
                    ..node(1, "failed", Some(1))
                },
            ],
        );
        platform
    }

    #[test]
    fn last_prints_run_summary() {
        let platform = platform_with_run();
        let mut ui = Recorder::default();

        let shown = last(
            &platform,
            &PipelineSelector::Named("shop".to_string()),
            None,
            &mut ui,
        )
        .expect("last");

        assert_eq!(shown.map(|run| run.number), Some(42));
        assert_eq!(
            ui.lines,
            vec![
                "=== Test run #42 succeeded",
                "Branch:  main",
                "Commit:  0123456 Fix checkout",
                "Created: 2024-05-01 12:30:00 UTC",
                "  node 0: succeeded (exit 0)",
                "  node 1: failed (exit 1)",
            ]
        );
    }

    #[test]
    fn last_filters_to_requested_node() {
        let platform = platform_with_run();
        let mut ui = Recorder::default();

        last(
            &platform,
            &PipelineSelector::Named("pipe-1".to_string()),
            Some(1),
            &mut ui,
        )
        .expect("last");

        assert_eq!(
            ui.lines[ui.lines.len() - 2..],
            vec![
                "  node 1: failed (exit 1)",
                "Output:  https://logs.example.com/run-42/1",
            ]
        );
        assert!(!ui.lines.iter().any(|line| line.contains("node 0")));
    }

    #[test]
    fn last_unknown_node_lists_available() {
        let platform = platform_with_run();
        let mut ui = Recorder::default();

        let err = last(
            &platform,
            &PipelineSelector::Named("shop".to_string()),
            Some(7),
            &mut ui,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "test node 7 not found. Available nodes: 0, 1");
        assert!(ui.lines.is_empty());
    }

    #[test]
    fn last_without_runs_warns() {
        let platform = FakePlatform {
            pipelines: vec![pipeline()],
            ..FakePlatform::default()
        };
        let mut ui = Recorder::default();

        let shown = last(
            &platform,
            &PipelineSelector::Named("shop".to_string()),
            None,
            &mut ui,
        )
        .expect("last");
        assert!(shown.is_none());
        assert_eq!(
            ui.warnings,
            vec!["No CI runs found for the specified app and/or pipeline."]
        );
    }

    #[test]
    fn app_selector_uses_coupling() {
        let platform = FakePlatform {
            coupling: Some(crate::platform::PipelineCoupling {
                pipeline: pipeline(),
            }),
            ..FakePlatform::default()
        };
        let resolved = PipelineSelector::App("shop-staging".to_string())
            .resolve(&platform)
            .expect("pipeline");
        assert_eq!(resolved.id, "pipe-1");
    }

    #[test]
    fn unknown_pipeline_is_an_api_error() {
        let platform = FakePlatform::default();
        let err = PipelineSelector::Named("nope".to_string())
            .resolve(&platform)
            .unwrap_err();
        assert!(matches!(err, CiError::Api(ref api) if api.status() == Some(404)));
    }

    #[test]
    fn describe_minimal_run() {
        let run = TestRun {
            id: "run-1".to_string(),
            number: 1,
            status: "pending".to_string(),
            commit_branch: None,
            commit_sha: Some("abc".to_string()),
            commit_message: None,
            created_at: None,
            message: Some("Waiting for a dyno".to_string()),
        };
        let pending = node(0, "pending", None);
        assert_eq!(
            describe_test_run(&run, &[&pending]),
            vec![
                "=== Test run #1 pending",
                "Commit:  abc",
                "Message: Waiting for a dyno",
                "  node 0: pending",
            ]
        );
    }
}
