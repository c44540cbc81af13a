use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sharpen_core::cst::lex_with_trivia;
use sharpen_core::{ParseOptions, parse};
use std::hint::black_box;

// Sample C# content for synthetic benchmarks
const SIMPLE_CLASS: &str = r#"namespace Sample;

public class Point
{
    public int X { get; init; }
    public int Y { get; init; }

    public double Length() => Math.Sqrt(X * X + Y * Y);
}
"#;

const COMPLEX_CLASS: &str = r#"using System;
using System.Collections.Generic;
using System.Linq;

namespace Sample.Services
{
    public sealed class OrderService<TOrder> where TOrder : class, IOrder, new()
    {
        private readonly Dictionary<int, List<TOrder>> _orders = new();

        public event EventHandler<OrderEventArgs>? Changed;

        public async Task<IReadOnlyList<TOrder>> FindAsync(int customer, CancellationToken token = default)
        {
            if (!_orders.TryGetValue(customer, out var list) || list is null)
            {
                return Array.Empty<TOrder>();
            }

            var (open, closed) = (list.Where(o => !o.Closed).ToList(), list.Count(o => o.Closed));
            await Task.Delay(1, token).ConfigureAwait(false);
            return open switch
            {
                { Count: 0 } => Array.Empty<TOrder>(),
                [var single] => new[] { single },
                _ => open.OrderBy(o => o.Id).Take(closed > 10 ? 10 : closed).ToList(),
            };
        }

        public static int Parse(string text)
        {
            try
            {
                return checked((int)long.Parse(text) * 2);
            }
            catch (FormatException e) when (e.Message.Length > 0)
            {
                return -1;
            }
            finally
            {
                Changed?.Invoke(null, OrderEventArgs.Empty);
            }
        }
    }
}
"#;

// Deliberately broken input exercising recovery
const BROKEN_CLASS: &str = r#"class Broken
{
    void M( { int x = ; if (x > ) { } }
    int Field
    public void N() { var y = (1, ; foo(]; }
"#;

/// Benchmark parsing different C# constructs
fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");
    let options = ParseOptions::default();

    for (name, source) in [
        ("simple_class", SIMPLE_CLASS),
        ("complex_class", COMPLEX_CLASS),
        ("broken_class", BROKEN_CLASS),
    ] {
        group.bench_function(name, |b| b.iter(|| black_box(parse(black_box(source), &options))));
    }

    group.finish();
}

/// Benchmark the lexer alone
fn bench_lexer(c: &mut Criterion) {
    c.bench_function("lexer/complex_class", |b| {
        b.iter(|| black_box(lex_with_trivia(black_box(COMPLEX_CLASS))))
    });
}

/// Benchmark parsing large generated files
fn bench_large_files(c: &mut Criterion) {
    let mut group = c.benchmark_group("large_files");
    let options = ParseOptions::default();

    // Generate files of different sizes
    for &size in &[10, 50, 100, 200, 500] {
        let mut large_content = String::from("namespace Generated;\n");
        for i in 0..size {
            large_content.push_str(&format!(
                r#"
public class Type{i}
{{
    private int _value = {i};

    public int Compute(int a, int b)
    {{
        for (var k = 0; k < a; k++) {{ b += k * _value; }}
        return a > b ? a - b : (int)(b / 2.0);
    }}
}}
"#
            ));
        }

        let bytes = large_content.len();
        group.throughput(Throughput::Bytes(bytes as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_classes_{}KB", size, bytes / 1024)),
            &large_content,
            |b, content| b.iter(|| black_box(parse(content, &options))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_parser, bench_lexer, bench_large_files);
criterion_main!(benches);
