use std::io::Cursor;

use anyhow::Result;

use hintergrund::consts::NO_BLOCK;
use hintergrund::copy::{copy_page, copy_table};
use hintergrund::{BlockRef, HgImage, Resolved};

const SEED: u64 = 0x00E0_4E1E;

fn image(pages: usize, ps: usize) -> HgImage<Cursor<Vec<u8>>> {
    let mut rng = oorandom::Rand32::new(SEED);
    let raw: Vec<u8> = (0..pages * ps).map(|_| rng.rand_u32() as u8).collect();
    HgImage::new(Cursor::new(raw), ps as u32).unwrap()
}

#[test]
fn resolve_is_absent_only_for_sentinel() {
    let mut rng = oorandom::Rand64::new(SEED.into());
    for ps in [256u32, 512, 4096] {
        for _ in 0..10_000 {
            let block = (rng.rand_u64() as u32) & NO_BLOCK;
            let control = rng.rand_u64() as u8;
            let r = BlockRef::new(block, control);
            match r.resolve(ps) {
                Resolved::Absent => assert_eq!(block, NO_BLOCK),
                Resolved::PageOffset(off) => {
                    assert_ne!(block, NO_BLOCK);
                    assert_eq!(off, block as u64 * ps as u64);
                }
            }
        }
        assert_eq!(BlockRef::new(0, 0).resolve(ps), Resolved::PageOffset(0));
        assert_eq!(
            BlockRef::new(0xFF_FFFE, 0).resolve(ps),
            Resolved::PageOffset(0xFF_FFFE * ps as u64)
        );
        assert_eq!(BlockRef::new(NO_BLOCK, 0).resolve(ps), Resolved::Absent);
    }
}

#[test]
fn copy_page_is_byte_exact_and_leaves_source_alone() -> Result<()> {
    let ps = 512;
    let mut img = image(8, ps);
    let before = img.get_ref().get_ref().clone();

    let mut rng = oorandom::Rand32::new(SEED ^ 1);
    let mut out = Vec::new();
    let mut picked = Vec::new();
    for _ in 0..32 {
        let block = rng.rand_range(0..8);
        picked.push(block as usize);
        copy_page(BlockRef::new(block, 0), &mut img, &mut out)?;
    }

    assert_eq!(out.len(), 32 * ps);
    for (i, block) in picked.iter().enumerate() {
        assert_eq!(
            &out[i * ps..(i + 1) * ps],
            &before[block * ps..(block + 1) * ps]
        );
    }
    assert_eq!(img.get_ref().get_ref(), &before);
    Ok(())
}

#[test]
fn copy_page_absent_appends_one_fill_page() -> Result<()> {
    let ps = 256;
    let mut img = image(2, ps);
    let mut out = vec![1u8, 2, 3];
    copy_page(BlockRef::HOLE, &mut img, &mut out)?;
    assert_eq!(out.len(), 3 + ps);
    assert!(out[3..].iter().all(|&b| b == 0xFF));
    Ok(())
}

#[test]
fn copy_table_present_honours_skip() -> Result<()> {
    let ps = 256;
    let cap = ps / 4;
    let mut img = image(6, ps);
    // страница 5 — block table: слот i → страница i % 4, последний — дыра
    let mut raw = img.into_inner().into_inner();
    let table = &mut raw[5 * ps..6 * ps];
    for i in 0..cap {
        let r = if i == cap - 1 {
            BlockRef::HOLE
        } else {
            BlockRef::new((i % 4) as u32, 0)
        };
        r.write(&mut table[i * 4..]);
    }
    let src = raw.clone();
    img = HgImage::new(Cursor::new(raw), ps as u32)?;

    for skip in [0usize, 3] {
        let mut out = Vec::new();
        let n = copy_table(BlockRef::new(5, 0), &mut img, &mut out, skip)?;
        assert_eq!(n as usize, (cap - skip) * ps);
        assert_eq!(out.len(), (cap - skip) * ps);
        for (k, i) in (skip..cap).enumerate() {
            let got = &out[k * ps..(k + 1) * ps];
            if i == cap - 1 {
                assert!(got.iter().all(|&b| b == 0xFF));
            } else {
                let p = i % 4;
                assert_eq!(got, &src[p * ps..(p + 1) * ps]);
            }
        }
    }
    Ok(())
}

#[test]
fn copy_table_absent_writes_capacity_minus_skip_pages() -> Result<()> {
    for ps in [256usize, 512] {
        let mut img = image(1, ps);
        for skip in [0usize, 3] {
            let mut out = Vec::new();
            copy_table(BlockRef::HOLE, &mut img, &mut out, skip)?;
            assert_eq!(out.len(), (ps / 4 - skip) * ps);
            assert!(out.iter().all(|&b| b == 0xFF));
        }
    }
    Ok(())
}
