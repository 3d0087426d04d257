use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rill_scanner::Scanner;

// A medium-size rill source with every kind of lexeme
const RILL_SOURCE: &str = r#"
// Number helpers
def gcd(a, b) {
    while b != 0 {
        t = b;
        b = a `mod` b;
        a = t;
    }
    return a;
}

/* Bit twiddling:
   masks, shifts and the backtick operators */
def popcount(x) {
    count = 0;
    while x > 0 {
        count += x `and` 1;
        x = x >> 1;
    }
    return count;
}

def mix(a, b) {
    return (a << 3) `xor` (b >> 2) `or` (a `div` 7);
}

def describe(n) {
    if n <= 0 && !(n == 0) {
        return "negative";
    } else {
        if n % 2 == 0 || n >= 1.5e3 {
            return "even or large";
        }
    }
    return "odd";
}

total = 0;
for i in 0..100 {
    total += gcd(i, 12) * popcount(i) - mix(i, .5);
    total -= 1;
    i++;
}
print describe(total);
print "multi
line string";
print [1, 2.25, 3e-2, 4E+10];
"#;

fn bench_scan_rill(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    group.throughput(Throughput::Bytes(RILL_SOURCE.len() as u64));
    group.bench_function("scan_rill_medium", |b| {
        b.iter(|| {
            let result = Scanner::new(black_box(RILL_SOURCE)).scan();
            black_box(result);
        });
    });

    let large = RILL_SOURCE.repeat(200);
    group.throughput(Throughput::Bytes(large.len() as u64));
    group.bench_function("scan_rill_large", |b| {
        b.iter(|| {
            let result = Scanner::new(black_box(&large)).scan();
            black_box(result);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_scan_rill);
criterion_main!(benches);
