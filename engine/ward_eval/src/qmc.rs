//! Quine-McCluskey minimisation over `(bits, mask)` implicants.
//!
//! A term's `mask` marks "don't care" variable positions; bits outside the
//! mask are literal. Each term carries `ids`, the set of original row
//! indices it covers, which drives both the merge-carry rule and the
//! prime-implicant chart. Don't-care rows participate in merging and prime
//! generation but never have to be covered, so the selected cover is
//! irredundant for the required minterms only (and not necessarily a
//! minimum cover).

use rustc_hash::FxHashSet;
use tracing::trace;

use crate::bitset::Bitset;

/// One selected product term of the cover.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct CoverTerm {
    /// Literal variable values; bits inside `mask` are zeroed.
    pub bits: u64,
    /// Bit set means "don't care".
    pub mask: u64,
}

#[derive(Clone, Debug)]
struct Term {
    bits: u64,
    mask: u64,
    ids: Bitset,
}

/// Minimise the boolean function whose true rows are `minterms` and whose
/// free rows are `dont_cares`, over `n` variables. Returns an irredundant
/// cover of the minterms.
pub(crate) fn minimize(n: usize, minterms: &Bitset, dont_cares: &Bitset) -> Vec<CoverTerm> {
    let rows = 1usize << n;
    let mut terms: Vec<Term> = minterms
        .iter_ones()
        .chain(dont_cares.iter_ones())
        .map(|row| Term {
            bits: row as u64,
            mask: 0,
            ids: Bitset::single(rows, row),
        })
        .collect();

    // Merge rounds: distribute terms into groups by popcount and combine
    // pairs from adjacent groups differing in exactly one literal bit. A
    // term survives a round as-is only if it was not merged and its rows
    // are not already covered by this round's merge results.
    loop {
        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); n + 1];
        for (index, term) in terms.iter().enumerate() {
            groups[term.bits.count_ones() as usize].push(index);
        }

        let mut merged: Vec<Term> = Vec::new();
        let mut seen: FxHashSet<(u64, u64)> = FxHashSet::default();
        let mut was_merged = vec![false; terms.len()];
        let mut coverage = Bitset::new(rows);

        for k in 0..n {
            for &i in &groups[k] {
                for &j in &groups[k + 1] {
                    let (t1, t2) = (&terms[i], &terms[j]);
                    if t1.mask != t2.mask {
                        continue;
                    }
                    let diff = t1.bits ^ t2.bits;
                    if diff.count_ones() != 1 {
                        continue;
                    }
                    was_merged[i] = true;
                    was_merged[j] = true;
                    let mask = t1.mask | diff;
                    let mut ids = t1.ids.clone();
                    ids.union_with(&t2.ids);
                    coverage.union_with(&ids);
                    if seen.insert((t1.bits & !mask, mask)) {
                        merged.push(Term {
                            bits: t1.bits & !mask,
                            mask,
                            ids,
                        });
                    }
                }
            }
        }

        if merged.is_empty() {
            break;
        }

        let mut next = merged;
        for (index, term) in terms.into_iter().enumerate() {
            if !was_merged[index] && !coverage.contains_all(&term.ids) {
                next.push(term);
            }
        }
        terms = next;
    }

    trace!(primes = terms.len(), "prime implicants collected");
    select(&terms, minterms, rows)
}

/// Prime-implicant chart: essential primes first, then a greedy walk over
/// whatever minterms remain uncovered.
fn select(primes: &[Term], minterms: &Bitset, rows: usize) -> Vec<CoverTerm> {
    let mut chosen: Vec<usize> = Vec::new();
    let mut covered = Bitset::new(rows);

    for row in minterms.iter_ones() {
        let mut covering = primes.iter().enumerate().filter(|(_, p)| p.ids.get(row));
        if let (Some((index, _)), None) = (covering.next(), covering.next()) {
            if !chosen.contains(&index) {
                chosen.push(index);
                covered.union_with(&primes[index].ids);
            }
        }
    }

    loop {
        let uncovered = minterms.and_not(&covered);
        if uncovered.is_empty() {
            break;
        }
        let mut best: Option<(usize, usize)> = None;
        for (index, prime) in primes.iter().enumerate() {
            if chosen.contains(&index) {
                continue;
            }
            let gain = prime.ids.intersect_count(&uncovered);
            if gain > 0 && best.map_or(true, |(_, best_gain)| gain > best_gain) {
                best = Some((index, gain));
            }
        }
        let Some((index, _)) = best else {
            // Every minterm seeds an initial term, so a cover always exists.
            break;
        };
        chosen.push(index);
        covered.union_with(&primes[index].ids);
    }

    chosen
        .into_iter()
        .map(|index| CoverTerm {
            bits: primes[index].bits,
            mask: primes[index].mask,
        })
        .collect()
}
