use super::AnalysisBackend;
use crate::config::{AnalysisConfig, Language};
use crate::document::{MediaKind, SourceDocument};
use crate::error::SummaryError;
use crate::summary::SummaryRecord;
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

/// Backend that answers with fixture data. Useful for trying the interface
/// without an API key.
pub struct DemoBackend {
    config: AnalysisConfig,
}

impl DemoBackend {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl AnalysisBackend for DemoBackend {
    fn name(&self) -> &'static str {
        "demo"
    }

    async fn analyze(&self, document: &SourceDocument) -> Result<SummaryRecord, SummaryError> {
        let cb = self.config.progress_callback.as_ref();
        if let Some(cb) = cb {
            cb.on_analysis_start(document.filename(), document.kind().media_type());
            cb.on_request_sent("demo", 0);
        }

        info!("Demo analysis of {}", document.filename());
        if self.config.demo_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.demo_delay_ms)).await;
        }

        let summary = demo_summary(document.kind(), self.config.language);
        if let Some(cb) = cb {
            cb.on_analysis_complete(&summary.product);
        }
        Ok(summary)
    }
}

/// Fixture summary for a document kind.
pub fn demo_summary(kind: &MediaKind, language: Language) -> SummaryRecord {
    match (kind, language) {
        (MediaKind::Pdf, Language::Fr) => SummaryRecord {
            product: "Machine à café Nespresso Vertuo".into(),
            quick_start: "Rincez le réservoir d'eau et remplissez-le. Insérez une capsule et fermez la tête. Appuyez sur le bouton pour lancer l'extraction automatique.".into(),
            safety: "Ne pas immerger l'appareil dans l'eau. Débrancher avant nettoyage. Ne pas utiliser avec des mains mouillées. Tenir hors de portée des enfants.".into(),
            maintenance: "Détartrer tous les 3 mois avec le kit fourni. Nettoyer le bac récupérateur quotidiennement. Vider le contenant à capsules régulièrement.".into(),
            troubleshooting: "Voyant rouge clignotant : détartrage nécessaire. Café trop froid : préchauffer la tasse. Pas d'extraction : vérifier le niveau d'eau et la capsule.".into(),
        },
        (MediaKind::Pdf, Language::En) => SummaryRecord {
            product: "Nespresso Vertuo coffee machine".into(),
            quick_start: "Rinse the water tank and fill it. Insert a capsule and close the head. Press the button to start automatic extraction.".into(),
            safety: "Never immerse the machine in water. Unplug before cleaning. Do not operate with wet hands. Keep out of reach of children.".into(),
            maintenance: "Descale every 3 months with the supplied kit. Empty the drip tray daily. Empty the capsule container regularly.".into(),
            troubleshooting: "Flashing red light: descaling needed. Coffee too cold: preheat the cup. No extraction: check the water level and the capsule.".into(),
        },
        (MediaKind::Image(_), Language::Fr) => SummaryRecord {
            product: "Aspirateur robot Roomba i7+".into(),
            quick_start: "Branchez la station de charge. Placez le robot sur la base pour charger 3h. Téléchargez l'app iRobot. Appuyez sur CLEAN pour démarrer.".into(),
            safety: "Ne pas utiliser sur surfaces mouillées. Retirer les câbles du sol. Surveiller lors de la première utilisation. Ne pas aspirer liquides.".into(),
            maintenance: "Vider le bac après chaque utilisation. Nettoyer les brosses hebdomadairement. Remplacer les filtres tous les 2 mois. Nettoyer les capteurs mensuellement.".into(),
            troubleshooting: "Erreur 1 : nettoyer les roues. Erreur 2 : débloquer les brosses. Ne démarre pas : vérifier la charge. Aspiration faible : vider le bac.".into(),
        },
        (MediaKind::Image(_), Language::En) => SummaryRecord {
            product: "Roomba i7+ robot vacuum".into(),
            quick_start: "Plug in the charging station. Leave the robot on the base for 3 hours to charge. Install the iRobot app. Press CLEAN to start.".into(),
            safety: "Do not use on wet floors. Clear cables from the floor. Supervise the first run. Never vacuum liquids.".into(),
            maintenance: "Empty the bin after every run. Clean the brushes weekly. Replace the filter every 2 months. Wipe the sensors monthly.".into(),
            troubleshooting: "Error 1: clean the wheels. Error 2: free the brushes. Won't start: check the charge. Weak suction: empty the bin.".into(),
        },
    }
}
