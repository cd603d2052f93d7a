use pk_core::{Domain, vec2};
use pk_layout::{LayoutParams, RadiusSampler, area_fraction, generate};
use proptest::prelude::*;

proptest! {
    #[test]
    fn generated_layouts_hit_target_inside_domain(
        count in 1usize..120,
        lx in 0.5f64..4.0,
        ly in 0.5f64..4.0,
        target in 0.05f64..0.8,
        seed in any::<u64>(),
    ) {
        let domain = Domain::new(vec2(-1.0, 2.0), vec2(-1.0 + lx, 2.0 + ly)).unwrap();
        let params = LayoutParams {
            count,
            sampler: RadiusSampler::new(0.1, 0.03).with_seed(seed),
            target_area_fraction: Some(target),
        };
        let circles = generate(&domain, &params).unwrap();

        prop_assert_eq!(circles.len(), count);
        prop_assert!((area_fraction(&circles, &domain) - target).abs() < 1e-9);
        for c in &circles {
            prop_assert!(c.radius() > 0.0);
            prop_assert!(domain.contains(c.center));
        }
    }
}

#[test]
fn without_target_radii_follow_the_sampler() {
    let domain = Domain::new(vec2(0.0, 0.0), vec2(1.0, 1.0)).unwrap();
    let sampler = RadiusSampler::new(0.05, 0.01).with_seed(9);
    let expected = sampler.sample(12).unwrap();
    let circles = generate(
        &domain,
        &LayoutParams {
            count: 12,
            sampler,
            target_area_fraction: None,
        },
    )
    .unwrap();
    let radii: Vec<f64> = circles.iter().map(|c| c.radius()).collect();
    assert_eq!(radii, expected);
}

#[test]
fn zero_count_is_rejected() {
    let domain = Domain::new(vec2(0.0, 0.0), vec2(1.0, 1.0)).unwrap();
    let params = LayoutParams {
        count: 0,
        sampler: RadiusSampler::new(0.05, 0.01),
        target_area_fraction: None,
    };
    assert!(generate(&domain, &params).is_err());
}
