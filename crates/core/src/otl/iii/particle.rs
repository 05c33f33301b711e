//! III.3: particles.
//!
//! Letters of a listed particle take their `particle` variant when the whole
//! particle stands alone, usually after MVS. An FVS after the particle keeps
//! the default forms.

use fea_composer::{GlyphSet, Lookup, Substitution};
use log::debug;

use crate::{
    Result,
    config::MVS,
    data::{
        LocaleId::{self, Mch, Mng, Sib, Tod},
        ParticleRule,
    },
    otl::{Composer, condition, rclt},
    plan::{GlyphCategory, GlyphSpec},
    position::{Init, JoiningPosition},
};

pub(super) fn compose(c: &mut Composer<'_>) -> Result<()> {
    for locale in c.among(&[Mng, Sib, Mch]) {
        listed(c, locale);
    }
    if c.requested(Tod) {
        todo_particle(c)?;
    }
    if c.requested(Mng) {
        let mut lookup = rclt("III.mvs.postprocessing.GB");
        let following = GlyphSet::union([
            c.letter(Mng, "vowel"),
            c.letter(Mng, "consonant"),
            c.glyphs(["nirugu", "nirugu.ignored"]),
        ]);
        lookup.push(
            Substitution::new()
                .input_with(c.class("mvs.invalid"), "_.wide")
                .slot(following),
        );
        c.add(lookup);
    }
    Ok(())
}

fn listed(c: &mut Composer<'_>, locale: LocaleId) {
    let fvs = c.class("fvs");
    let mut lookup = rclt(format!("III.particle.{locale}")).mark_filtering_set(fvs.clone());
    let particles: Vec<&ParticleRule> = c.data().particles_of(locale).collect();
    for particle in particles {
        let (Some(first), Some(last)) = (particle.indices.iter().min(), particle.indices.iter().max()) else {
            continue;
        };
        let first = if particle.after_mvs { 0 } else { *first };
        let count = particle.aliases.len();

        let (mut rule, mut ignore) = if particle.after_mvs {
            let mvs = c.class("mvs");
            (Substitution::new().input_with(mvs.clone(), "_.wide"), Substitution::new().input(mvs))
        } else {
            (Substitution::new(), Substitution::new())
        };
        for (i, alias) in particle.aliases.iter().enumerate() {
            let class = c.letter(locale, &format!("{alias}.{}", JoiningPosition::of_run(i, count)));
            if particle.indices.contains(&i) {
                rule = rule.input_with(class.clone(), condition(locale, "particle"));
                ignore = ignore.input(class);
            } else if (first..=*last).contains(&i) {
                rule = rule.input(class.clone());
                ignore = ignore.input(class);
            } else {
                rule = rule.slot(class.clone());
                ignore = ignore.slot(class);
            }
        }
        debug!("{locale} particle {}", particle.aliases.join(" "));
        lookup.push(ignore.slot(fvs.clone()));
        lookup.push(rule);
    }
    c.add(lookup);
}

/// Todo _n_ after MVS before a final _i_ gets its own glyph.
fn todo_particle(c: &mut Composer<'_>) -> Result<()> {
    let Some(default) = c.default_glyph(Tod, "n", Init)? else {
        return Ok(());
    };
    let base = default.to_string();
    if !c.available(&base) {
        return Ok(());
    }
    let name = default.with_suffix(MVS).to_string();
    c.add_glyph(&name, GlyphSpec::composite([base]), GlyphCategory::Base);

    let n_init = c.letter(Tod, "n.init");
    let mut lookup = Lookup::new("TOD:particle");
    lookup.push(Substitution::new().slot(n_init.clone()).by(c.glyph(&name)));
    c.add(lookup);

    let mut lookup = rclt("III.particle.TOD").ignore_marks();
    lookup.push(
        Substitution::new()
            .input_with(c.class("mvs"), "_.wide")
            .input_with(n_init, condition(Tod, "particle"))
            .slot(c.letter(Tod, "i.fina")),
    );
    c.add(lookup);
    Ok(())
}
