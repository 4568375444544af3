// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use riskflow::decode::{decode_reply, AgentReply};
use riskflow::model::{Graph, NodeId};
use riskflow::ops::{apply_batch, BatchReport, ToolCall};

// Benchmark identity (keep stable):
// - Group names in this file: `ops.apply_batch`, `decode.markup`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time.
fn checksum_report(report: &BatchReport) -> u64 {
    let mut acc = 0u64;
    acc = acc.wrapping_mul(131).wrapping_add(report.applied as u64);
    acc = acc.wrapping_mul(131).wrapping_add(report.skipped as u64);
    acc = acc.wrapping_mul(131).wrapping_add(report.log.len() as u64);
    acc
}

fn chain_graph(steps: usize) -> Graph {
    let mut graph = Graph::new();
    for idx in 0..steps {
        let id = NodeId::new(format!("step_{idx:04}")).expect("node id");
        graph.add_node(Some(id), &format!("Step {idx}"));
        if idx > 0 {
            graph.connect(&format!("step_{:04}", idx - 1), &format!("step_{idx:04}"), None);
        }
    }
    graph
}

/// A process-building batch: nodes, a connecting chain, then one risk and control per node.
fn build_calls(steps: usize) -> Vec<ToolCall> {
    let mut calls = Vec::with_capacity(steps * 4);
    for idx in 0..steps {
        calls.push(
            ToolCall::new("add_node")
                .with_arg("id", format!("bench_{idx:04}"))
                .with_arg("title", format!("Bench step {idx}")),
        );
    }
    for idx in 1..steps {
        calls.push(
            ToolCall::new("connect_nodes")
                .with_arg("sourceId", format!("bench_{:04}", idx - 1))
                .with_arg("targetId", format!("bench_{idx:04}")),
        );
    }
    for idx in 0..steps {
        calls.push(
            ToolCall::new("add_risk")
                .with_arg("targetId", format!("bench_{idx:04}"))
                .with_arg("name", format!("Risk {idx}")),
        );
        calls.push(
            ToolCall::new("add_control")
                .with_arg("targetId", format!("bench_{idx:04}"))
                .with_arg("riskName", format!("risk {idx}"))
                .with_arg("name", format!("Control {idx}")),
        );
    }
    calls
}

fn markup_reply(steps: usize) -> AgentReply {
    let mut text = String::from("Here is the process.\n");
    for idx in 0..steps {
        text.push_str(&format!(
            "<invoke name=\"add_node\"><parameter name=\"id\">m_{idx}</parameter>\
             <parameter name=\"title\">Markup step {idx}</parameter></invoke>\n"
        ));
    }
    text.push_str("That covers it.");
    AgentReply::text(text)
}

fn benches_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("ops.apply_batch");

    for (case, base_steps, batch_steps) in [
        ("small", 5, 5),
        ("medium", 50, 25),
        ("large", 500, 100),
    ] {
        let base = chain_graph(base_steps);
        let calls = build_calls(batch_steps);

        group.throughput(Throughput::Elements(calls.len() as u64));
        group.bench_function(case, |b| {
            b.iter(|| {
                let outcome = apply_batch(black_box(&base), black_box(&calls));
                black_box(checksum_report(&outcome.report))
            })
        });
    }

    group.finish();

    let mut group = c.benchmark_group("decode.markup");
    for (case, steps) in [("small", 3), ("large", 200)] {
        let reply = markup_reply(steps);
        group.throughput(Throughput::Elements(steps as u64));
        group.bench_function(case, |b| {
            b.iter(|| {
                let decoded = decode_reply(black_box(&reply));
                black_box(decoded.calls.len() + decoded.narrative.len())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, benches_ops);
criterion_main!(benches);
