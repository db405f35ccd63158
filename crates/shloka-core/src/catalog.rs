//! Bundled verse records and random selection.

use crate::{entropy::EntropySource, settings::Translation};

/// One devotional verse with its reference and translations.
///
/// `primary` is the romanized (IAST) Sanskrit text and is always shown;
/// the two translations correspond to the user-selectable options.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Verse {
    pub chapter: u16,
    pub verse: u16,
    pub primary: &'static str,
    pub english: &'static str,
    pub spanish: &'static str,
}

impl Verse {
    /// Returns the translation matching the user's preference.
    pub fn translation(&self, translation: Translation) -> &'static str {
        match translation {
            Translation::English => self.english,
            Translation::Spanish => self.spanish,
        }
    }
}

/// Catalog errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CatalogError {
    /// The catalog holds no verses.
    Empty,
}

/// Read-only catalog over an immutable verse slice.
#[derive(Clone, Copy, Debug)]
pub struct VerseCatalog<'a> {
    verses: &'a [Verse],
}

impl<'a> VerseCatalog<'a> {
    pub const fn new(verses: &'a [Verse]) -> Self {
        Self { verses }
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// Picks a uniformly random verse.
    ///
    /// Maps one 32-bit draw onto the index range with a widening multiply,
    /// which keeps the distribution even without rejection loops.
    pub fn pick<E>(&self, entropy: &mut E) -> Result<&'a Verse, CatalogError>
    where
        E: EntropySource,
    {
        if self.verses.is_empty() {
            return Err(CatalogError::Empty);
        }

        let draw = entropy.next_u32() as u64;
        let index = ((draw * self.verses.len() as u64) >> 32) as usize;
        Ok(&self.verses[index])
    }
}

/// Verse set compiled into the firmware.
pub const BUNDLED_VERSES: [Verse; 12] = [
    Verse {
        chapter: 2,
        verse: 47,
        primary: "karmaṇy evādhikāras te mā phaleṣu kadācana mā karma-phala-hetur bhūr mā te \
saṅgo 'stv akarmaṇi",
        english: "You have a right to your actions alone, never to their fruits. Let not the \
fruits of action be your motive, nor let your attachment be to inaction.",
        spanish: "Tienes derecho solo a la acción, nunca a sus frutos. Que el fruto de la acción \
no sea tu motivo, ni te apegues a la inacción.",
    },
    Verse {
        chapter: 2,
        verse: 20,
        primary: "na jāyate mriyate vā kadācin nāyaṁ bhūtvā bhavitā vā na bhūyaḥ",
        english: "The soul is never born, nor does it ever die; unborn, eternal and ancient, it \
is not slain when the body is slain.",
        spanish: "El alma nunca nace ni muere; no nacida, eterna y antigua, no perece cuando \
perece el cuerpo.",
    },
    Verse {
        chapter: 2,
        verse: 48,
        primary: "yoga-sthaḥ kuru karmāṇi saṅgaṁ tyaktvā dhanañjaya siddhy-asiddhyoḥ samo bhūtvā \
samatvaṁ yoga ucyate",
        english: "Established in yoga, perform your actions, abandoning attachment, remaining \
even in success and failure. Evenness of mind is called yoga.",
        spanish: "Firme en el yoga, realiza tus acciones abandonando el apego, igual en el éxito \
y en el fracaso. La ecuanimidad se llama yoga.",
    },
    Verse {
        chapter: 2,
        verse: 14,
        primary: "mātrā-sparśās tu kaunteya śītoṣṇa-sukha-duḥkha-dāḥ āgamāpāyino 'nityās tāṁs \
titikṣasva bhārata",
        english: "Contacts of the senses bring cold and heat, pleasure and pain; they come and \
go and do not last. Endure them bravely, O Bharata.",
        spanish: "Los contactos de los sentidos traen frío y calor, placer y dolor; vienen y \
van, no perduran. Sopórtalos con valor, oh Bharata.",
    },
    Verse {
        chapter: 2,
        verse: 40,
        primary: "nehābhikrama-nāśo 'sti pratyavāyo na vidyate sv-alpam apy asya dharmasya \
trāyate mahato bhayāt",
        english: "In this path no effort is ever lost and no harm is done; even a little of \
this practice protects from great fear.",
        spanish: "En esta senda ningún esfuerzo se pierde ni hay daño alguno; aun un poco de \
esta práctica libra de un gran temor.",
    },
    Verse {
        chapter: 3,
        verse: 19,
        primary: "tasmād asaktaḥ satataṁ kāryaṁ karma samācara asakto hy ācaran karma param \
āpnoti pūruṣaḥ",
        english: "Therefore, without attachment, always do the work that must be done; doing \
work without attachment one attains the highest.",
        spanish: "Por eso, sin apego, haz siempre la obra que debe hacerse; obrando sin apego \
se alcanza lo supremo.",
    },
    Verse {
        chapter: 4,
        verse: 7,
        primary: "yadā yadā hi dharmasya glānir bhavati bhārata abhyutthānam adharmasya \
tadātmānaṁ sṛjāmy aham",
        english: "Whenever righteousness declines and unrighteousness rises, O Bharata, then I \
send forth myself.",
        spanish: "Siempre que la rectitud decae y lo injusto se levanta, oh Bharata, yo mismo \
me manifiesto.",
    },
    Verse {
        chapter: 6,
        verse: 5,
        primary: "uddhared ātmanātmānaṁ nātmānam avasādayet ātmaiva hy ātmano bandhur ātmaiva \
ripur ātmanaḥ",
        english: "Let a man raise himself by his own self; let him not lower himself. The self \
alone is the friend of the self, and the self alone its enemy.",
        spanish: "Que cada uno se eleve por sí mismo y no se degrade; uno mismo es su propio \
amigo y uno mismo su propio enemigo.",
    },
    Verse {
        chapter: 6,
        verse: 19,
        primary: "yathā dīpo nivāta-stho neṅgate sopamā smṛtā yogino yata-cittasya yuñjato \
yogam ātmanaḥ",
        english: "As a lamp in a windless place does not flicker, so is the disciplined mind of \
a yogi absorbed in the self.",
        spanish: "Como una lámpara en un lugar sin viento no parpadea, así es la mente serena \
del yogui absorta en el ser.",
    },
    Verse {
        chapter: 9,
        verse: 22,
        primary: "ananyāś cintayanto māṁ ye janāḥ paryupāsate teṣāṁ nityābhiyuktānāṁ yoga-kṣemaṁ \
vahāmy aham",
        english: "To those who worship me with single minds, ever devoted, I bring what they \
lack and preserve what they have.",
        spanish: "A quienes me adoran con mente firme, siempre unidos a mí, les traigo lo que \
les falta y les guardo lo que poseen.",
    },
    Verse {
        chapter: 17,
        verse: 3,
        primary: "sattvānurūpā sarvasya śraddhā bhavati bhārata śraddhā-mayo 'yaṁ puruṣo yo \
yac-chraddhaḥ sa eva saḥ",
        english: "The faith of each person follows their nature, O Bharata. A person is made of \
faith; whatever their faith is, that they are.",
        spanish: "La fe de cada uno sigue su naturaleza, oh Bharata. El ser humano está hecho \
de fe; según es su fe, así es él.",
    },
    Verse {
        chapter: 18,
        verse: 66,
        primary: "sarva-dharmān parityajya mām ekaṁ śaraṇaṁ vraja ahaṁ tvā sarva-pāpebhyo \
mokṣayiṣyāmi mā śucaḥ",
        english: "Abandon all duties and take refuge in me alone; I shall free you from all \
evil, do not grieve.",
        spanish: "Abandona todo deber y refúgiate solo en mí; yo te libraré de todo mal, no te \
aflijas.",
    },
];

/// Catalog over the bundled verse set.
pub fn bundled_catalog() -> VerseCatalog<'static> {
    VerseCatalog::new(&BUNDLED_VERSES)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEntropy(u32);

    impl EntropySource for FixedEntropy {
        fn next_u32(&mut self) -> u32 {
            self.0
        }
    }

    #[test]
    fn pick_always_returns_a_member() {
        let catalog = bundled_catalog();

        for seed in [0u32, 1, 0x4000_0000, 0x8000_0001, 0xFFFF_FFFF] {
            let mut entropy = FixedEntropy(seed);
            let picked = catalog.pick(&mut entropy).unwrap();
            assert!(BUNDLED_VERSES.iter().any(|v| v == picked));
        }
    }

    #[test]
    fn extreme_draws_map_to_first_and_last() {
        let catalog = bundled_catalog();

        let first = catalog.pick(&mut FixedEntropy(0)).unwrap();
        assert_eq!((first.chapter, first.verse), (2, 47));

        let last = catalog.pick(&mut FixedEntropy(u32::MAX)).unwrap();
        assert_eq!((last.chapter, last.verse), (18, 66));
    }

    #[test]
    fn single_entry_catalog_always_returns_it() {
        let verses = [BUNDLED_VERSES[3]];
        let catalog = VerseCatalog::new(&verses);

        for seed in [0u32, 0x1234_5678, u32::MAX] {
            let picked = catalog.pick(&mut FixedEntropy(seed)).unwrap();
            assert_eq!(picked, &verses[0]);
        }
    }

    #[test]
    fn empty_catalog_fails() {
        let catalog = VerseCatalog::new(&[]);
        assert_eq!(
            catalog.pick(&mut FixedEntropy(7)).unwrap_err(),
            CatalogError::Empty
        );
    }

    #[test]
    fn translations_follow_preference() {
        let verse = &BUNDLED_VERSES[0];
        assert_eq!(verse.translation(Translation::English), verse.english);
        assert_eq!(verse.translation(Translation::Spanish), verse.spanish);
    }
}
