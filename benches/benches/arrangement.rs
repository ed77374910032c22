use criterion::{black_box, criterion_group, criterion_main, Criterion};
use engine::{collect_entries, ArrangementSettings, GroupingRule};
use ir::TextRange;
use parsers::parse_str;

/// A class with `n` fields, accessor pairs, call chains and an anonymous
/// class per block, in the shape of hand-written service code.
fn synthetic_class(n: usize) -> String {
    let mut src = String::from("package bench;\n\npublic class Service extends Base {\n");
    for i in 0..n {
        src.push_str(&format!("    private int value{i}, spare{i};\n"));
    }
    src.push_str("    static { init(); }\n");
    for i in 0..n {
        src.push_str(&format!(
            "    public int getValue{i}() {{ return value{i}; }}\n\
             \x20   public void setValue{i}(int v) {{ this.value{i} = v; }}\n\
             \x20   void step{i}() {{ getValue{i}(); setValue{i}(step{next}(1)); }}\n\
             \x20   int step{next}(int x) {{ return x; }}\n\
             \x20   Runnable task{i} = new Runnable() {{ public void run() {{ step{i}(); }} }};\n",
            next = i + n,
        ));
    }
    src.push_str("    static void init() {}\n    @Override public String toString() { return \"\"; }\n}\n");
    src.push_str("class Base { public String toString() { return null; } }\n");
    src
}

fn bench_parse(c: &mut Criterion) {
    let src = synthetic_class(200);
    c.bench_function("parse_java", |b| {
        b.iter(|| parse_str(black_box(&src), "Service.java").unwrap())
    });
}

fn bench_collect(c: &mut Criterion) {
    let src = synthetic_class(200);
    let unit = parse_str(&src, "Service.java").unwrap();
    let resolver = unit.resolver();
    let doc = unit.document();
    let whole = [TextRange::new(0, src.len())];
    let plain = ArrangementSettings::new();
    let grouped: ArrangementSettings = GroupingRule::ALL.into_iter().collect();

    c.bench_function("collect_entries", |b| {
        b.iter(|| collect_entries(&unit.tree, &resolver, None, black_box(&whole), &plain))
    });
    c.bench_function("collect_entries_grouped_snapped", |b| {
        b.iter(|| {
            collect_entries(&unit.tree, &resolver, Some(&doc), black_box(&whole), &grouped)
        })
    });

    let scoped = [doc.lines_range(10, 20).unwrap()];
    c.bench_function("collect_entries_scoped", |b| {
        b.iter(|| collect_entries(&unit.tree, &resolver, Some(&doc), black_box(&scoped), &grouped))
    });

    let info = collect_entries(&unit.tree, &resolver, None, &whole, &grouped);
    c.bench_function("method_dependency_roots", |b| {
        b.iter(|| black_box(&info).method_dependency_roots())
    });
}

criterion_group!(benches, bench_parse, bench_collect);
criterion_main!(benches);
