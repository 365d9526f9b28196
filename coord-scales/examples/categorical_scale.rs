use coord_scales::categorical::{CategoricalScale, CategoricalValue};
use coord_scales::factor::FactorRange;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Categorical Coordinate Scale ===\n");

    // Example 1: even spacing over a render interval
    println!("1. Forward mapping:");

    let factors = vec!["foo", "bar", "baz"];
    let scale = CategoricalScale::try_new(factors.clone())?.range((20.0, 80.0));

    for factor in &factors {
        println!("  '{}' → {}", factor, scale.compute(*factor)?);
    }

    // Example 2: offsets within (and beyond) a factor's slot
    println!("\n2. Offsets from a factor's center:");

    for offset in [-0.6, -0.5, 0.0, 0.5, 0.6] {
        println!("  ('foo', {:+}) → {}", offset, scale.compute(("foo", offset))?);
    }

    // Example 3: vectorized mapping with mixed value shapes
    println!("\n3. Vectorized mapping:");

    let values: Vec<CategoricalValue<&str>> =
        vec!["foo".into(), ("bar", 0.25).into(), "baz".into()];
    let mapped = scale.v_compute(&values)?.as_vec(values.len());
    println!("  {:?} → {:?}", values, mapped);

    // Example 4: continuous inversion into synthetic coordinates
    println!("\n4. Inverse mapping (render coordinate → synthetic coordinate):");

    for rvalue in [20.0, 30.0, 50.0, 80.0] {
        println!("  {} → {}", rvalue, scale.invert(rvalue)?);
    }

    // Example 5: replacing the factor set on a shared range
    println!("\n5. Live factor replacement:");

    let shared = FactorRange::try_new(vec!["foo", "bar", "baz"])?.into_shared();
    let scale = CategoricalScale::with_source_range(shared.clone()).range((20.0, 80.0));
    println!("  before: 'foo' → {}", scale.compute("foo")?);

    shared.write().unwrap().set_factors(vec!["a", "b", "c", "d"])?;
    println!("  after:  'a' → {}", scale.compute("a")?);
    println!("  after:  'd' → {}", scale.compute("d")?);

    Ok(())
}
