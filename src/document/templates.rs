//! The embedded blank-package template `Document::create` boots from.
//!
//! One entry per sub-package category, kept to the minimum a valid package
//! needs: baseline styles and swatches, one font family, one master spread
//! with a single US-letter page. `create` then rewrites the page bounds and
//! stamps a working spread from the master.

use std::collections::BTreeMap;

pub(crate) const MIMETYPE_PATH: &str = "mimetype";
pub(crate) const MIMETYPE: &str = "application/vnd.adobe.indesign-idml-package";

pub(crate) const DESIGNMAP: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<?aid style="50" type="document" readerVersion="6.0" featureSet="257" product="20.0(49)" ?>
<Document xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="20.0" Self="d" StoryList="" Name="Untitled" ZeroPoint="0 0" ActiveLayer="ulayer1" CMYKProfile="U.S. Web Coated (SWOP) v2" RGBProfile="sRGB IEC61966-2.1">
  <Language Self="Language/$ID/English%3a USA" Name="$ID/English: USA" SingleQuotes="&apos;&apos;" DoubleQuotes="&quot;&quot;" PrimaryLanguageName="$ID/English" SublanguageName="$ID/USA" Id="269" HyphenationVendor="Hunspell" SpellingVendor="Hunspell"/>
  <idPkg:Graphic src="Resources/Graphic.xml"/>
  <idPkg:Fonts src="Resources/Fonts.xml"/>
  <idPkg:Styles src="Resources/Styles.xml"/>
  <idPkg:Preferences src="Resources/Preferences.xml"/>
  <idPkg:MasterSpread src="MasterSpreads/MasterSpread_umaster.xml"/>
  <Layer Self="ulayer1" Name="Layer 1" Visible="true" Locked="false" IgnoreWrap="false" ShowGuides="true" LockGuides="false" UI="true" Expendable="true" Printable="true">
    <Properties>
      <LayerColor type="enumeration">LightBlue</LayerColor>
    </Properties>
  </Layer>
</Document>
"#;

pub(crate) const GRAPHIC: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<idPkg:Graphic xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="20.0">
  <Color Self="Color/Black" Model="Process" Space="CMYK" ColorValue="0 0 0 100" ColorOverride="Specialblack" AlternateSpace="NoAlternateColor" AlternateColorValue="" Name="Black" ColorEditable="false" ColorRemovable="false" Visible="true" SwatchCreatorID="7937" SwatchColorGroupReference="u18ColorGroupSwatch3"/>
  <Color Self="Color/Paper" Model="Process" Space="CMYK" ColorValue="0 0 0 0" ColorOverride="Specialpaper" AlternateSpace="NoAlternateColor" AlternateColorValue="" Name="Paper" ColorEditable="true" ColorRemovable="false" Visible="true" SwatchCreatorID="7937" SwatchColorGroupReference="u18ColorGroupSwatch1"/>
  <Color Self="Color/Registration" Model="Registration" Space="CMYK" ColorValue="100 100 100 100" ColorOverride="Specialregistration" AlternateSpace="NoAlternateColor" AlternateColorValue="" Name="Registration" ColorEditable="false" ColorRemovable="false" Visible="true" SwatchCreatorID="7937" SwatchColorGroupReference="u18ColorGroupSwatch4"/>
  <Swatch Self="Swatch/None" Name="None" ColorEditable="false" ColorRemovable="false" Visible="true" SwatchCreatorID="7937"/>
  <StrokeStyle Self="StrokeStyle/$ID/Solid" Name="$ID/Solid"/>
</idPkg:Graphic>
"#;

pub(crate) const FONTS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<idPkg:Fonts xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="20.0">
  <FontFamily Self="difont1" Name="Minion Pro">
    <Font Self="difont1FontnMinion Pro Regular" FontFamily="Minion Pro" Name="Minion Pro Regular" PostScriptName="$ID/MinionPro-Regular" Status="Installed" FontStyleName="Regular" FontType="OpenTypeCFF" WritingScript="0" FullName="$ID/Minion Pro" FullNameNative="$ID/Minion Pro" FontStyleNameNative="$ID/Regular" PlatformName="$ID/" Version="Version 2.068"/>
  </FontFamily>
</idPkg:Fonts>
"#;

pub(crate) const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<idPkg:Styles xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="20.0">
  <RootCharacterStyleGroup Self="ucsgroup">
    <CharacterStyle Self="CharacterStyle/$ID/[No character style]" Imported="false" SplitDocument="false" EmitCss="true" IncludeClass="true" Name="$ID/[No character style]"/>
  </RootCharacterStyleGroup>
  <RootParagraphStyleGroup Self="upsgroup">
    <ParagraphStyle Self="ParagraphStyle/$ID/[No paragraph style]" Name="$ID/[No paragraph style]" Imported="false" NextStyle="ParagraphStyle/$ID/[No paragraph style]" SplitDocument="false" EmitCss="true" IncludeClass="true" Justification="LeftAlign" PointSize="12" Leading="14.4" Hyphenation="true" Tracking="0">
      <Properties>
        <AppliedFont type="string">Minion Pro</AppliedFont>
      </Properties>
    </ParagraphStyle>
  </RootParagraphStyleGroup>
  <RootObjectStyleGroup Self="uosgroup">
    <ObjectStyle Self="ObjectStyle/$ID/[None]" Name="$ID/[None]" AppliedParagraphStyle="ParagraphStyle/$ID/[No paragraph style]"/>
    <ObjectStyle Self="ObjectStyle/$ID/[Normal Graphics Frame]" Name="$ID/[Normal Graphics Frame]" AppliedParagraphStyle="ParagraphStyle/$ID/[No paragraph style]"/>
    <ObjectStyle Self="ObjectStyle/$ID/[Normal Text Frame]" Name="$ID/[Normal Text Frame]" AppliedParagraphStyle="ParagraphStyle/$ID/[No paragraph style]"/>
  </RootObjectStyleGroup>
  <RootTableStyleGroup Self="utsgroup">
    <TableStyle Self="TableStyle/$ID/[No table style]" Name="$ID/[No table style]"/>
  </RootTableStyleGroup>
  <RootCellStyleGroup Self="uclsgroup">
    <CellStyle Self="CellStyle/$ID/[None]" Name="$ID/[None]"/>
  </RootCellStyleGroup>
</idPkg:Styles>
"#;

pub(crate) const PREFERENCES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<idPkg:Preferences xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="20.0">
  <DocumentPreference PageHeight="792" PageWidth="612" PagesPerDocument="1" FacingPages="false" DocumentBleedTopOffset="0" DocumentBleedBottomOffset="0" DocumentBleedInsideOrLeftOffset="0" DocumentBleedOutsideOrRightOffset="0" DocumentSlugUniformSize="true" Intent="PrintIntent" PageBinding="LeftToRight" AllowPageShuffle="true" OverprintBlack="true" PreserveLayoutWhenShuffling="true"/>
  <ViewPreference HorizontalMeasurementUnits="Points" VerticalMeasurementUnits="Points" RulerOrigin="SpreadOrigin" PointsPerInch="72"/>
  <PrintPreference PageRange="$ID/AllPages" PrintPageOrientation="Portrait" PaperSize="$ID/Letter"/>
  <TransparencyPreference AlphaIsTransparency="true"/>
</idPkg:Preferences>
"#;

pub(crate) const MASTER_SPREAD: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<idPkg:MasterSpread xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="20.0">
  <MasterSpread Self="umaster" Name="A-Master" NamePrefix="A" BaseName="Master" ShowMasterItems="true" PageCount="1" OverriddenPageItemProps="" ItemTransform="1 0 0 1 0 0" PageColor="UseMasterColor" PrimaryTextFrame="n">
    <Page Self="umasterpage" Name="A" AppliedTrapPreset="TrapPreset/$ID/kDefaultTrapStyleName" GeometricBounds="0 0 792 612" ItemTransform="1 0 0 1 -306 -396" MasterPageTransform="1 0 0 1 0 0" TabOrder="" GridStartingPoint="TopOutside" UseMasterGrid="true">
      <Properties>
        <PageColor type="enumeration">UseMasterColor</PageColor>
        <Descriptor type="list">
          <ListItem type="string">A</ListItem>
          <ListItem type="long">1</ListItem>
        </Descriptor>
      </Properties>
      <MarginPreference ColumnCount="1" ColumnGutter="12" Top="36" Bottom="36" Left="36" Right="36" ColumnDirection="Horizontal" ColumnsPositions="0 540"/>
      <GridDataInformation Self="umastergrid" FontStyle="Regular" PointSize="12" CharacterAki="0" LineAki="9" HorizontalScale="100" VerticalScale="100" LineAlignment="LeftOrTopLineJustify" GridAlignment="AlignEmCenter" CharacterAlignment="AlignEmCenter">
        <Properties>
          <AppliedFont type="string">Minion Pro</AppliedFont>
        </Properties>
      </GridDataInformation>
    </Page>
  </MasterSpread>
</idPkg:MasterSpread>
"#;

/// The blank package as an archive entry map.
pub(crate) fn template_entries() -> BTreeMap<String, Vec<u8>> {
    let mut entries = BTreeMap::new();
    entries.insert(MIMETYPE_PATH.to_string(), MIMETYPE.as_bytes().to_vec());
    entries.insert("designmap.xml".to_string(), DESIGNMAP.as_bytes().to_vec());
    entries.insert(
        "Resources/Graphic.xml".to_string(),
        GRAPHIC.as_bytes().to_vec(),
    );
    entries.insert("Resources/Fonts.xml".to_string(), FONTS.as_bytes().to_vec());
    entries.insert(
        "Resources/Styles.xml".to_string(),
        STYLES.as_bytes().to_vec(),
    );
    entries.insert(
        "Resources/Preferences.xml".to_string(),
        PREFERENCES.as_bytes().to_vec(),
    );
    entries.insert(
        "MasterSpreads/MasterSpread_umaster.xml".to_string(),
        MASTER_SPREAD.as_bytes().to_vec(),
    );
    entries
}
